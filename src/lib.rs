//! vfuse: in-process virtual filesystem core
//!
//! A tree of named directories and files whose contents come from a
//! pluggable backend instead of disk blocks. Backends implement the small
//! primitive contract in [`backend::VfsBackend`] and inherit the compound
//! operations (rename, truncate, create) derived from it; [`metadir`]
//! supplies a complete in-memory backend with single-owner write
//! authorization, and [`kvfs`] one backed by any key-value store. The
//! `fuse` feature adds the single-threaded [`dispatch`] loop that pumps
//! requests from a kernel-facing transport.
#![cfg_attr(not(test), no_std)]
extern crate alloc;

#[cfg(feature = "fuse")]
extern crate std;

pub mod attr;
pub mod backend;
mod common;
pub mod kvfs;
pub mod metadir;
pub mod path;

#[cfg(feature = "fuse")]
pub mod dispatch;

#[cfg(test)]
mod backend_test;

#[cfg(all(test, feature = "fuse"))]
mod dispatch_test;

use spin::Once;

pub use attr::VfsAttr;
pub use backend::{fresh_handle, FileHandle, OpenMode, VfsBackend};
pub use common::{VfsError, VfsFileType, VfsPermission, VfsResult, VfsTimeSpec};
pub use kvfs::{KvFs, KvStore};
pub use metadir::{MetaDir, MetaDirFs};

/// Process-wide identity and clock configuration.
///
/// Attribute records take their uid/gid and all three timestamps from here;
/// the initialization instant is captured once per process lifetime and
/// never updated by filesystem operations.
#[derive(Debug, Clone, Copy)]
pub struct FsConfig {
    pub uid: u32,
    pub gid: u32,
    pub init_time: VfsTimeSpec,
}

impl FsConfig {
    pub const fn new(uid: u32, gid: u32, init_time: VfsTimeSpec) -> Self {
        Self {
            uid,
            gid,
            init_time,
        }
    }

    /// Snapshot the wall clock as the initialization instant.
    #[cfg(any(test, feature = "fuse"))]
    pub fn capture(uid: u32, gid: u32) -> Self {
        Self::new(uid, gid, VfsTimeSpec::from(std::time::SystemTime::now()))
    }
}

impl Default for FsConfig {
    fn default() -> Self {
        Self::new(0, 0, VfsTimeSpec::new(0, 0))
    }
}

static CONFIG: Once<FsConfig> = Once::new();

/// Register the process-wide configuration. The first call wins; later
/// calls (and any query before the first call) leave it unchanged.
pub fn init_fs(config: FsConfig) {
    CONFIG.call_once(|| config);
}

/// Current process-wide configuration, defaulted lazily on first use.
pub fn fs_config() -> &'static FsConfig {
    CONFIG.call_once(FsConfig::default)
}
