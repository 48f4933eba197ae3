//! Single-threaded dispatch loop over the kernel-facing transport
//!
//! The transport owns the mounted descriptor and knows how to decode and
//! answer exactly one pending request; this module only blocks until the
//! descriptor is readable and hands control over, one request at a time.
//! There is no request overlap and no reentrancy into backend operations.

use core::sync::atomic::{AtomicBool, Ordering};

use alloc::sync::Arc;
use log::{debug, error};
use std::os::unix::io::RawFd;

use crate::{
    common::{VfsError, VfsResult},
    init_fs, FsConfig,
};

/// Kernel-facing transport contract.
///
/// The transport exposes the readiness-pollable descriptor of the mounted
/// filesystem, processes one raw request per `process` call (invoking the
/// backend and writing the reply itself), and supplies the identities used
/// for attribute defaults and the namespace authorization gate.
pub trait Transport {
    /// Descriptor to poll for request readiness.
    fn fuse_fd(&self) -> RawFd;

    /// Read and answer exactly one pending request.
    fn process(&mut self) -> VfsResult<()>;

    /// Owner uid, used for attribute defaults and as the write gate.
    fn uid(&self) -> u32;

    /// Owner gid.
    fn gid(&self) -> u32;

    /// Uid of the process issuing the current request.
    fn reader_uid(&self) -> u32;

    fn mountpoint(&self) -> &str;
}

/// Cancellation handle for a running [`DispatchLoop`].
///
/// Stopping is coarse: it prevents future iterations but does not interrupt
/// an in-flight request or a blocked poll.
#[derive(Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct DispatchLoop {
    running: Arc<AtomicBool>,
}

impl DispatchLoop {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.running.clone())
    }

    /// Pump requests until stopped.
    ///
    /// Registers the owner identity and the initialization instant once,
    /// then blocks on the descriptor and processes one request per wakeup.
    /// A failed request is logged and the loop continues; only a poll
    /// failure is fatal.
    pub fn run(&self, transport: &mut dyn Transport) -> VfsResult<()> {
        init_fs(FsConfig::capture(transport.uid(), transport.gid()));

        let fd = transport.fuse_fd();
        debug!("dispatch loop started on fd {}", fd);
        while self.running.load(Ordering::SeqCst) {
            wait_readable(fd)?;
            if let Err(e) = transport.process() {
                error!("request failed: {}", e);
            }
        }
        debug!("dispatch loop stopped");
        Ok(())
    }
}

impl Default for DispatchLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Block until `fd` is readable. EINTR is retried.
fn wait_readable(fd: RawFd) -> VfsResult<()> {
    loop {
        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let rc = unsafe { libc::poll(&mut pfd, 1, -1) };
        if rc > 0 {
            return Ok(());
        }
        if rc < 0 {
            let err = std::io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EINTR) {
                continue;
            }
            error!("poll failed: {}", err);
            return Err(VfsError::Io);
        }
    }
}

/// Detach the mountpoint through the platform unmount facility. Invoked by
/// the caller after the loop has exited, not by the loop itself.
pub fn unmount(mountpoint: &str) -> VfsResult<()> {
    let status = std::process::Command::new("fusermount")
        .arg("-u")
        .arg(mountpoint)
        .status()
        .map_err(|_| VfsError::Io)?;
    if status.success() {
        Ok(())
    } else {
        Err(VfsError::Io)
    }
}
