//! In-memory hierarchical namespace
//!
//! [`MetaDir`] is a recursive tree of named subdirectories and named leaf
//! values; every operation resolves one path component and recurses into the
//! owning child. [`MetaDirFs`] wraps a root node into a full [`VfsBackend`]
//! with an open-handle table and a single-owner authorization gate, making
//! the namespace usable on its own or as the top of a composed tree
//! (pre-built nodes can be attached with [`MetaDir::mkdir_node`]).

use alloc::{
    collections::{BTreeMap, BTreeSet},
    string::String,
    vec::Vec,
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    attr::VfsAttr,
    backend::{FileHandle, OpenMode, OpenSession, VfsBackend},
    common::{VfsError, VfsResult},
    path::split_path,
};

/// One directory node. A name is either a subdirectory or a file, never
/// both; `mkdir` and `write_to` reject the colliding case.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MetaDir {
    dirs: BTreeMap<String, MetaDir>,
    files: BTreeMap<String, Vec<u8>>,
}

impl MetaDir {
    pub fn new() -> Self {
        Self::default()
    }

    fn child(&self, name: &str) -> VfsResult<&MetaDir> {
        self.dirs.get(name).ok_or(VfsError::NotFound)
    }

    fn child_mut(&mut self, name: &str) -> VfsResult<&mut MetaDir> {
        self.dirs.get_mut(name).ok_or(VfsError::NotFound)
    }

    /// Entry names under `path`, sorted and duplicate-free.
    pub fn contents(&self, path: &str) -> VfsResult<Vec<String>> {
        match split_path(path) {
            (None, _) => {
                let names: BTreeSet<&String> =
                    self.dirs.keys().chain(self.files.keys()).collect();
                Ok(names.into_iter().cloned().collect())
            }
            (Some(name), None) => self.child(&name)?.contents("/"),
            (Some(name), Some(rest)) => self.child(&name)?.contents(&rest),
        }
    }

    pub fn is_directory(&self, path: &str) -> bool {
        match split_path(path) {
            (None, _) => true,
            (Some(name), None) => self.dirs.contains_key(&name),
            (Some(name), Some(rest)) => self
                .dirs
                .get(&name)
                .map_or(false, |d| d.is_directory(&rest)),
        }
    }

    pub fn is_file(&self, path: &str) -> bool {
        match split_path(path) {
            (None, _) => false,
            (Some(name), None) => self.files.contains_key(&name),
            (Some(name), Some(rest)) => {
                self.dirs.get(&name).map_or(false, |d| d.is_file(&rest))
            }
        }
    }

    /// Leaf value at `path`.
    pub fn read_file(&self, path: &str) -> VfsResult<Vec<u8>> {
        match split_path(path) {
            (None, _) => Err(VfsError::NotFound),
            (Some(name), None) => {
                self.files.get(&name).cloned().ok_or(VfsError::NotFound)
            }
            (Some(name), Some(rest)) => self.child(&name)?.read_file(&rest),
        }
    }

    /// Insert or overwrite the leaf value at `path`.
    ///
    /// A name already held by a subdirectory is rejected with `IsDirectory`
    /// rather than shadowed; the root itself cannot hold a value.
    pub fn write_to(&mut self, path: &str, value: Vec<u8>) -> VfsResult<()> {
        match split_path(path) {
            (None, _) => Err(VfsError::NotFound),
            (Some(name), None) => {
                if self.dirs.contains_key(&name) {
                    return Err(VfsError::IsDirectory);
                }
                self.files.insert(name, value);
                Ok(())
            }
            (Some(name), Some(rest)) => self.child_mut(&name)?.write_to(&rest, value),
        }
    }

    /// Remove the leaf value at `path`.
    pub fn delete(&mut self, path: &str) -> VfsResult<()> {
        match split_path(path) {
            (None, _) => Err(VfsError::NotFound),
            (Some(name), None) => self
                .files
                .remove(&name)
                .map(|_| ())
                .ok_or(VfsError::NotFound),
            (Some(name), Some(rest)) => self.child_mut(&name)?.delete(&rest),
        }
    }

    /// Create an empty subdirectory at `path`.
    pub fn mkdir(&mut self, path: &str) -> VfsResult<()> {
        self.mkdir_node(path, MetaDir::new())
    }

    /// Attach `node` (possibly a pre-built subtree) at `path`.
    pub fn mkdir_node(&mut self, path: &str, node: MetaDir) -> VfsResult<()> {
        match split_path(path) {
            (None, _) => Err(VfsError::NotFound),
            (Some(name), None) => {
                if self.dirs.contains_key(&name) || self.files.contains_key(&name) {
                    return Err(VfsError::AlreadyExists);
                }
                debug!("metadir: mkdir {}", name);
                self.dirs.insert(name, node);
                Ok(())
            }
            (Some(name), Some(rest)) => self.child_mut(&name)?.mkdir_node(&rest, node),
        }
    }

    /// Remove the subdirectory at `path`, discarding its whole subtree.
    /// There is no emptiness check.
    pub fn rmdir(&mut self, path: &str) -> VfsResult<()> {
        match split_path(path) {
            (None, _) => Err(VfsError::NotFound),
            (Some(name), None) => {
                debug!("metadir: rmdir {}", name);
                self.dirs
                    .remove(&name)
                    .map(|_| ())
                    .ok_or(VfsError::NotFound)
            }
            (Some(name), Some(rest)) => self.child_mut(&name)?.rmdir(&rest),
        }
    }
}

/// [`VfsBackend`] over a root [`MetaDir`], gated by a single owner uid.
///
/// The `can_*` predicates are consulted by the transport before each
/// mutation; the mutating operations themselves do not re-check, so calling
/// one without its predicate is a caller error.
pub struct MetaDirFs {
    owner: u32,
    root: MetaDir,
    sessions: BTreeMap<FileHandle, OpenSession>,
}

impl MetaDirFs {
    pub fn new(owner: u32) -> Self {
        Self::with_root(owner, MetaDir::new())
    }

    pub fn with_root(owner: u32, root: MetaDir) -> Self {
        Self {
            owner,
            root,
            sessions: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &MetaDir {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut MetaDir {
        &mut self.root
    }

    fn authorized(&self, caller: u32) -> bool {
        caller == self.owner
    }

    /// Writes are permitted anywhere once the caller is the owner.
    pub fn can_write(&self, caller: u32, _path: &str) -> bool {
        self.authorized(caller)
    }

    /// Only existing files may be deleted.
    pub fn can_delete(&self, caller: u32, path: &str) -> bool {
        self.authorized(caller) && self.root.is_file(path)
    }

    /// The terminal name must not be in use by a file or a subdirectory.
    pub fn can_mkdir(&self, caller: u32, path: &str) -> bool {
        self.authorized(caller)
            && !self.root.is_file(path)
            && !self.root.is_directory(path)
    }

    /// Only an existing subdirectory (never the root) may be removed.
    pub fn can_rmdir(&self, caller: u32, path: &str) -> bool {
        self.authorized(caller)
            && !crate::path::scan_path(path).is_empty()
            && self.root.is_directory(path)
    }
}

impl VfsBackend for MetaDirFs {
    fn is_directory(&self, path: &str) -> bool {
        self.root.is_directory(path)
    }

    fn is_file(&self, path: &str) -> bool {
        self.root.is_file(path)
    }

    fn contents(&self, path: &str) -> VfsResult<Vec<String>> {
        self.root.contents(path)
    }

    fn getattr(&self, path: &str) -> VfsResult<VfsAttr> {
        if self.root.is_file(path) {
            let body = self.root.read_file(path)?;
            Ok(VfsAttr::file().with_size(body.len() as u64))
        } else if self.root.is_directory(path) {
            Ok(VfsAttr::dir())
        } else {
            Err(VfsError::NotFound)
        }
    }

    fn open(&mut self, path: &str, mode: OpenMode, fh: FileHandle) -> VfsResult<()> {
        let buf = if mode.readable() {
            self.root.read_file(path).unwrap_or_default()
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
        self.root.write_to(path, session.buf)
    }

    fn delete(&mut self, path: &str) -> VfsResult<()> {
        self.root.delete(path)
    }

    fn mkdir(&mut self, path: &str, _mode: u32) -> VfsResult<()> {
        self.root.mkdir(path)
    }

    fn rmdir(&mut self, path: &str) -> VfsResult<()> {
        self.root.rmdir(path)
    }
}
