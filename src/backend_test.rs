//! Tests for the emulated compound operations, driven through the in-memory
//! backend as the concrete primitive provider.
#[cfg(test)]
mod tests {
    use crate::{
        fresh_handle, fs_config, init_fs, FsConfig, MetaDirFs, OpenMode, VfsBackend, VfsError,
        VfsFileType, VfsTimeSpec,
    };

    const OWNER: u32 = 1000;

    fn test_fs() -> MetaDirFs {
        init_fs(FsConfig::new(OWNER, OWNER, VfsTimeSpec::new(7, 0)));
        MetaDirFs::new(OWNER)
    }

    fn put(fs: &mut MetaDirFs, path: &str, body: &[u8]) {
        let fh = fresh_handle();
        fs.open(path, OpenMode::Write, fh).unwrap();
        fs.write(path, 0, body, fh).unwrap();
        fs.close(path, fh).unwrap();
    }

    fn get(fs: &mut MetaDirFs, path: &str) -> alloc::vec::Vec<u8> {
        let size = fs.getattr(path).unwrap().size as usize;
        let fh = fresh_handle();
        fs.open(path, OpenMode::Read, fh).unwrap();
        let body = fs.read(path, 0, size, fh).unwrap();
        fs.close(path, fh).unwrap();
        body
    }

    #[test]
    fn create_then_getattr_reports_empty_file() {
        let mut fs = test_fs();
        fs.create("/f", 0o644).unwrap();

        let attr = fs.getattr("/f").unwrap();
        assert_eq!(attr.kind, VfsFileType::File);
        assert_eq!(attr.size, 0);
        assert_eq!(attr.hard_links, 1);
        assert_eq!(attr.uid, OWNER);
        assert_eq!(attr.atime, fs_config().init_time);
        assert_eq!(attr.mtime, fs_config().init_time);
        assert_eq!(attr.ctime, fs_config().init_time);
    }

    #[test]
    fn getattr_size_tracks_content() {
        let mut fs = test_fs();
        fs.create("/f", 0o644).unwrap();
        put(&mut fs, "/f", b"0123456789");
        assert_eq!(fs.getattr("/f").unwrap().size, 10);
    }

    #[test]
    fn getattr_directory_defaults() {
        let mut fs = test_fs();
        fs.mkdir("/d", 0o755).unwrap();

        let attr = fs.getattr("/d").unwrap();
        assert_eq!(attr.kind, VfsFileType::Dir);
        assert_eq!(attr.size, 4096);
        assert_eq!(fs.getattr("/missing"), Err(VfsError::NotFound));
    }

    #[test]
    fn truncate_pads_with_nul_bytes() {
        let mut fs = test_fs();
        put(&mut fs, "/f", b"hello");
        fs.truncate("/f", 8).unwrap();
        assert_eq!(get(&mut fs, "/f"), b"hello\0\0\0");
    }

    #[test]
    fn truncate_cuts_to_length() {
        let mut fs = test_fs();
        put(&mut fs, "/f", b"hello");
        fs.truncate("/f", 3).unwrap();
        assert_eq!(get(&mut fs, "/f"), b"hel");
    }

    #[test]
    fn truncate_to_same_length_is_identity() {
        let mut fs = test_fs();
        put(&mut fs, "/f", b"hello");
        fs.truncate("/f", 5).unwrap();
        assert_eq!(get(&mut fs, "/f"), b"hello");
    }

    #[test]
    fn rename_moves_content() {
        let mut fs = test_fs();
        put(&mut fs, "/p", b"data");
        fs.rename("/p", "/q").unwrap();

        assert!(fs.is_file("/q"));
        assert!(!fs.is_file("/p"));
        assert_eq!(get(&mut fs, "/q"), b"data");
    }

    #[test]
    fn rename_missing_source_fails() {
        let mut fs = test_fs();
        assert_eq!(fs.rename("/nope", "/q"), Err(VfsError::NotFound));
        assert!(!fs.is_file("/q"));
    }

    #[test]
    fn rename_across_directories() {
        let mut fs = test_fs();
        fs.mkdir("/a", 0o755).unwrap();
        fs.mkdir("/b", 0o755).unwrap();
        put(&mut fs, "/a/f", b"payload");

        fs.rename("/a/f", "/b/g").unwrap();
        assert_eq!(get(&mut fs, "/b/g"), b"payload");
        assert!(fs.contents("/a").unwrap().is_empty());
        assert_eq!(fs.contents("/b").unwrap(), vec!["g"]);
    }

    #[test]
    fn rename_into_missing_directory_leaves_source() {
        let mut fs = test_fs();
        put(&mut fs, "/p", b"data");
        // The destination close fails; rename is not atomic and the source
        // survives untouched.
        assert_eq!(fs.rename("/p", "/no/such/q"), Err(VfsError::NotFound));
        assert_eq!(get(&mut fs, "/p"), b"data");
    }

    #[test]
    fn create_overwrites_existing_content() {
        let mut fs = test_fs();
        put(&mut fs, "/f", b"old");
        fs.create("/f", 0o644).unwrap();
        assert_eq!(fs.getattr("/f").unwrap().size, 0);
    }
}
