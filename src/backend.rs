//! Backend contract and emulated compound operations
//!
//! A backend supplies the primitive operations; `rename`, `truncate` and
//! `create` are derived from them here so concrete backends never have to
//! reimplement the read-modify-write sequences.

use alloc::{string::String, vec::Vec};
use core::sync::atomic::{AtomicU64, Ordering};

use crate::{
    attr::VfsAttr,
    common::{VfsResult, VfsError},
};

/// Identity token scoping one open/close session against a path. The
/// transport mints its own handles; this counter serves the emulation layer.
pub type FileHandle = u64;

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Mint a handle that is unique for the process lifetime.
pub fn fresh_handle() -> FileHandle {
    NEXT_HANDLE.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
    ReadWrite,
}

impl OpenMode {
    pub fn readable(self) -> bool {
        matches!(self, OpenMode::Read | OpenMode::ReadWrite)
    }

    pub fn writable(self) -> bool {
        matches!(self, OpenMode::Write | OpenMode::ReadWrite)
    }
}

/// One open file session: the mode it was opened with and the working copy
/// of the content. Backends keep these in a handle table and commit the
/// buffer on `close`.
#[derive(Debug, Clone)]
pub struct OpenSession {
    pub mode: OpenMode,
    pub buf: Vec<u8>,
}

impl OpenSession {
    pub fn new(mode: OpenMode, buf: Vec<u8>) -> Self {
        Self { mode, buf }
    }

    /// Up to `len` bytes starting at `offset`, clamped to the buffer.
    pub fn read_at(&self, offset: u64, len: usize) -> Vec<u8> {
        let off = offset as usize;
        if off >= self.buf.len() {
            return Vec::new();
        }
        let end = core::cmp::min(off + len, self.buf.len());
        self.buf[off..end].to_vec()
    }

    /// Overwrite starting at `offset`, growing the buffer as needed. A gap
    /// between the current end and `offset` is filled with NUL bytes.
    pub fn write_at(&mut self, offset: u64, data: &[u8]) {
        let off = offset as usize;
        let end = off + data.len();
        if self.buf.len() < end {
            self.buf.resize(end, 0);
        }
        self.buf[off..end].copy_from_slice(data);
    }
}

/// The operation contract every backend implements.
///
/// The nine required methods are the primitives the kernel-facing transport
/// calls; the provided methods derive the compound operations purely in
/// terms of those primitives. Directory mutation is optional: backends with
/// no directory support keep the `NotSupported` defaults.
pub trait VfsBackend {
    fn is_directory(&self, path: &str) -> bool;

    fn is_file(&self, path: &str) -> bool;

    /// Entry names of a directory, sorted and duplicate-free.
    fn contents(&self, path: &str) -> VfsResult<Vec<String>>;

    /// Fresh attribute record; size reflects current content.
    fn getattr(&self, path: &str) -> VfsResult<VfsAttr>;

    /// Prepare `fh` for reads and writes. On read-containing modes the
    /// current content must become visible through the handle.
    fn open(&mut self, path: &str, mode: OpenMode, fh: FileHandle) -> VfsResult<()>;

    fn read(&mut self, path: &str, offset: u64, len: usize, fh: FileHandle) -> VfsResult<Vec<u8>>;

    fn write(&mut self, path: &str, offset: u64, data: &[u8], fh: FileHandle) -> VfsResult<()>;

    /// Commit the handle's buffered content as the path's persisted content
    /// and invalidate the handle.
    fn close(&mut self, path: &str, fh: FileHandle) -> VfsResult<()>;

    fn delete(&mut self, path: &str) -> VfsResult<()>;

    fn mkdir(&mut self, _path: &str, _mode: u32) -> VfsResult<()> {
        Err(VfsError::NotSupported)
    }

    fn rmdir(&mut self, _path: &str) -> VfsResult<()> {
        Err(VfsError::NotSupported)
    }

    /// Move `path` to `destpath` by copying content and deleting the source.
    ///
    /// Not atomic: a fault between the destination write and the source
    /// delete leaves both paths populated.
    fn rename(&mut self, path: &str, destpath: &str) -> VfsResult<()> {
        let stat = self.getattr(path)?;

        let fh = fresh_handle();
        self.open(path, OpenMode::Read, fh)?;
        let body = self.read(path, 0, stat.size as usize, fh)?;
        self.close(path, fh)?;

        let fh = fresh_handle();
        self.open(destpath, OpenMode::Write, fh)?;
        self.write(destpath, 0, &body, fh)?;
        self.close(destpath, fh)?;

        self.delete(path)
    }

    /// Adjust `path` to exactly `len` bytes, NUL-padding or cutting.
    fn truncate(&mut self, path: &str, len: u64) -> VfsResult<()> {
        let len = len as usize;

        let fh = fresh_handle();
        self.open(path, OpenMode::Read, fh)?;
        let body = self.read(path, 0, len, fh);
        self.close(path, fh)?;
        let mut body = body?;

        if body.len() < len {
            // The pad length must be computed before extending.
            let missing = len - body.len();
            body.extend(core::iter::repeat(0u8).take(missing));
        } else {
            body.truncate(len);
        }

        let fh = fresh_handle();
        self.open(path, OpenMode::Write, fh)?;
        self.write(path, 0, &body, fh)?;
        self.close(path, fh)
    }

    /// Establish an empty file at `path`. The mode bits are accepted for
    /// contract parity but not applied.
    fn create(&mut self, path: &str, _mode: u32) -> VfsResult<()> {
        let fh = fresh_handle();
        self.open(path, OpenMode::Write, fh)?;
        self.write(path, 0, &[], fh)?;
        self.close(path, fh)
    }
}
