//! Attribute records returned by `getattr`
//!
//! A record is built fresh on every query and never mutated afterwards.
//! Ownership and timestamps come from the process-wide [`FsConfig`]; size is
//! re-derived from current content by the backend, not cached here.
//!
//! [`FsConfig`]: crate::FsConfig

use crate::{
    common::{VfsFileType, VfsPermission, VfsTimeSpec},
    fs_config,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VfsAttr {
    pub perm: VfsPermission,
    pub kind: VfsFileType,
    pub size: u64,
    pub hard_links: u32,
    pub uid: u32,
    pub gid: u32,
    pub atime: VfsTimeSpec,
    pub mtime: VfsTimeSpec,
    pub ctime: VfsTimeSpec,
}

impl VfsAttr {
    fn with_defaults(perm: VfsPermission, kind: VfsFileType, size: u64) -> Self {
        let config = fs_config();
        Self {
            perm,
            kind,
            size,
            hard_links: 1,
            uid: config.uid,
            gid: config.gid,
            atime: config.init_time,
            mtime: config.init_time,
            ctime: config.init_time,
        }
    }

    /// Regular-file defaults: mode 0666, empty.
    pub fn file() -> Self {
        Self::with_defaults(
            VfsPermission::S_IFREG | VfsPermission::from_bits_truncate(0o666),
            VfsFileType::File,
            0,
        )
    }

    /// Directory defaults: mode 0777, conventional 4096-byte size.
    pub fn dir() -> Self {
        Self::with_defaults(
            VfsPermission::S_IFDIR | VfsPermission::from_bits_truncate(0o777),
            VfsFileType::Dir,
            4096,
        )
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }
}
