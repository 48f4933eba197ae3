//! Shared types for the virtual filesystem core
//!
//! This module provides the error taxonomy, permission bits and timestamp
//! type used by every backend, independent of any concrete storage.

use onlyerror::Error;
use serde::{Deserialize, Serialize};

pub type VfsResult<T> = Result<T, VfsError>;

/// Domain errors surfaced to the kernel-facing transport.
///
/// Missing paths, entries and handles are reported as values, never by
/// panicking; the transport translates them into the reply it sends back.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VfsError {
    /// path or entry does not exist
    NotFound,
    /// caller identity is not the configured owner
    PermissionDenied,
    /// name is already in use
    AlreadyExists,
    /// name refers to a directory
    IsDirectory,
    /// path is not a directory
    NotDirectory,
    /// handle is invalid or already closed
    BadHandle,
    /// operation is not implemented by this backend
    NotSupported,
    /// descriptor or subprocess failure
    Io,
}

#[cfg(feature = "fuse")]
impl VfsError {
    /// Errno the transport replies with for this error, negated.
    pub fn errno(&self) -> i32 {
        let e = match self {
            VfsError::NotFound => libc::ENOENT,
            VfsError::PermissionDenied => libc::EACCES,
            VfsError::AlreadyExists => libc::EEXIST,
            VfsError::IsDirectory => libc::EISDIR,
            VfsError::NotDirectory => libc::ENOTDIR,
            VfsError::BadHandle => libc::EBADF,
            VfsError::NotSupported => libc::ENOSYS,
            VfsError::Io => libc::EIO,
        };
        -e
    }
}

/// Timestamp with nanosecond precision.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VfsTimeSpec {
    pub sec: u64,
    pub nsec: u32,
}

impl VfsTimeSpec {
    pub const fn new(sec: u64, nsec: u32) -> Self {
        Self { sec, nsec }
    }
}

#[cfg(any(test, feature = "fuse"))]
impl From<std::time::SystemTime> for VfsTimeSpec {
    fn from(value: std::time::SystemTime) -> Self {
        match value.duration_since(std::time::UNIX_EPOCH) {
            Ok(d) => Self::new(d.as_secs(), d.subsec_nanos()),
            Err(_) => Self::default(),
        }
    }
}

bitflags::bitflags! {
    /// File mode bits, type tag included, as stored in an attribute record.
    pub struct VfsPermission: u32 {
        const S_IFMT = 0o170000;
        const S_IFDIR = 0o040000;
        const S_IFREG = 0o100000;
        const S_IRWXU = 0o700;
        const S_IRUSR = 0o400;
        const S_IWUSR = 0o200;
        const S_IXUSR = 0o100;
        const S_IRWXG = 0o070;
        const S_IRGRP = 0o040;
        const S_IWGRP = 0o020;
        const S_IXGRP = 0o010;
        const S_IRWXO = 0o007;
        const S_IROTH = 0o004;
        const S_IWOTH = 0o002;
        const S_IXOTH = 0o001;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VfsFileType {
    File,
    Dir,
}
