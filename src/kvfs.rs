//! Key-value store backend
//!
//! Files and directory listings laid out flat in any key-value store: the
//! body of `/a/b` lives under `file:/a/b`, and each directory keeps a
//! JSON-serialized listing of its child names under `dir:<path>`. Listings
//! are stored sorted and duplicate-free. The store itself is reached only
//! through the [`KvStore`] trait, so a remote or distributed client plugs in
//! the same way as an in-memory map.

use alloc::{
    collections::{BTreeMap, BTreeSet},
    format,
    string::String,
    sync::Arc,
    vec::Vec,
};

use crate::{
    attr::VfsAttr,
    backend::{FileHandle, OpenMode, OpenSession, VfsBackend},
    common::{VfsError, VfsResult},
    path::{basename, dirname},
};

/// Minimal client contract for the underlying key-value store.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn put(&self, key: &str, value: Vec<u8>);
    fn remove(&self, key: &str);
}

fn dir_key(path: &str) -> String {
    format!("dir:{}", path)
}

fn file_key(path: &str) -> String {
    format!("file:{}", path)
}

pub struct KvFs {
    store: Arc<dyn KvStore>,
    sessions: BTreeMap<FileHandle, OpenSession>,
}

impl KvFs {
    /// Wrap a store, seeding an empty root listing if none is present.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        let fs = Self {
            store,
            sessions: BTreeMap::new(),
        };
        if fs.dir_entries("/").is_none() {
            fs.set_dir("/", &[]);
        }
        fs
    }

    fn dir_entries(&self, path: &str) -> Option<Vec<String>> {
        let raw = self.store.get(&dir_key(path))?;
        serde_json::from_slice(&raw).ok()
    }

    fn set_dir(&self, path: &str, entries: &[String]) {
        let sorted: BTreeSet<&String> = entries.iter().collect();
        let names: Vec<&String> = sorted.into_iter().collect();
        // A listing of plain strings always serializes.
        let raw = serde_json::to_vec(&names).unwrap_or_default();
        self.store.put(&dir_key(path), raw);
    }

    fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        self.store.get(&file_key(path))
    }

    fn set_file(&self, path: &str, body: Vec<u8>) {
        self.store.put(&file_key(path), body);
    }

    /// Merge `name` into the listing of `dir`.
    fn add_entry(&self, dir: &str, name: String) -> VfsResult<()> {
        let mut entries = self.dir_entries(dir).ok_or(VfsError::NotFound)?;
        entries.push(name);
        self.set_dir(dir, &entries);
        Ok(())
    }

    /// Drop `name` from the listing of `dir`, if the listing exists.
    fn remove_entry(&self, dir: &str, name: &str) {
        if let Some(mut entries) = self.dir_entries(dir) {
            entries.retain(|e| e != name);
            self.set_dir(dir, &entries);
        }
    }
}

impl VfsBackend for KvFs {
    fn is_directory(&self, path: &str) -> bool {
        self.store.get(&dir_key(path)).is_some()
    }

    fn is_file(&self, path: &str) -> bool {
        self.store.get(&file_key(path)).is_some()
    }

    fn contents(&self, path: &str) -> VfsResult<Vec<String>> {
        self.dir_entries(path).ok_or(VfsError::NotFound)
    }

    fn getattr(&self, path: &str) -> VfsResult<VfsAttr> {
        if let Some(body) = self.get_file(path) {
            Ok(VfsAttr::file().with_size(body.len() as u64))
        } else if self.is_directory(path) {
            Ok(VfsAttr::dir())
        } else {
            Err(VfsError::NotFound)
        }
    }

    fn open(&mut self, path: &str, mode: OpenMode, fh: FileHandle) -> VfsResult<()> {
        let buf = if mode.readable() {
            self.get_file(path).unwrap_or_default()
        } else {
            Vec::new()
        };
        self.sessions.insert(fh, OpenSession::new(mode, buf));
        Ok(())
    }

    fn read(&mut self, _path: &str, offset: u64, len: usize, fh: FileHandle) -> VfsResult<Vec<u8>> {
        let session = self.sessions.get(&fh).ok_or(VfsError::BadHandle)?;
        Ok(session.read_at(offset, len))
    }

    fn write(&mut self, _path: &str, offset: u64, data: &[u8], fh: FileHandle) -> VfsResult<()> {
        let session = self.sessions.get_mut(&fh).ok_or(VfsError::BadHandle)?;
        session.write_at(offset, data);
        Ok(())
    }

    fn close(&mut self, path: &str, fh: FileHandle) -> VfsResult<()> {
        let session = self.sessions.remove(&fh).ok_or(VfsError::BadHandle)?;
        self.set_file(path, session.buf);
        self.add_entry(&dirname(path), basename(path))
    }

    fn delete(&mut self, path: &str) -> VfsResult<()> {
        if self.get_file(path).is_none() {
            return Err(VfsError::NotFound);
        }
        self.store.remove(&file_key(path));
        self.remove_entry(&dirname(path), &basename(path));
        Ok(())
    }

    fn mkdir(&mut self, path: &str, _mode: u32) -> VfsResult<()> {
        if self.is_file(path) || self.is_directory(path) {
            return Err(VfsError::AlreadyExists);
        }
        // The parent listing must exist before the child listing is created.
        self.add_entry(&dirname(path), basename(path))?;
        self.set_dir(path, &[]);
        Ok(())
    }

    fn rmdir(&mut self, path: &str) -> VfsResult<()> {
        if !self.is_directory(path) {
            return Err(VfsError::NotFound);
        }
        self.store.remove(&dir_key(path));
        self.remove_entry(&dirname(path), &basename(path));
        Ok(())
    }
}
