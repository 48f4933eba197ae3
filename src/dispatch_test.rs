#[cfg(test)]
mod tests {
    use std::os::unix::io::RawFd;

    use crate::{
        dispatch::{DispatchLoop, StopHandle, Transport},
        VfsResult,
    };

    /// Transport over a plain pipe: every byte in the pipe is one pending
    /// request, and processing consumes exactly one byte.
    struct PipeTransport {
        read_fd: RawFd,
        processed: usize,
        limit: usize,
        stop: StopHandle,
    }

    impl Transport for PipeTransport {
        fn fuse_fd(&self) -> RawFd {
            self.read_fd
        }

        fn process(&mut self) -> VfsResult<()> {
            let mut byte = [0u8; 1];
            let n = unsafe { libc::read(self.read_fd, byte.as_mut_ptr() as *mut _, 1) };
            assert_eq!(n, 1);
            self.processed += 1;
            if self.processed == self.limit {
                self.stop.stop();
            }
            Ok(())
        }

        fn uid(&self) -> u32 {
            1000
        }

        fn gid(&self) -> u32 {
            1000
        }

        fn reader_uid(&self) -> u32 {
            1000
        }

        fn mountpoint(&self) -> &str {
            "/mnt/test"
        }
    }

    fn pipe() -> (RawFd, RawFd) {
        let mut fds = [0; 2];
        let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
        assert_eq!(rc, 0);
        (fds[0], fds[1])
    }

    #[test]
    fn processes_one_request_per_wakeup_until_stopped() {
        let (read_fd, write_fd) = pipe();
        let written = unsafe { libc::write(write_fd, b"abc".as_ptr() as *const _, 3) };
        assert_eq!(written, 3);

        let looper = DispatchLoop::new();
        let mut transport = PipeTransport {
            read_fd,
            processed: 0,
            limit: 3,
            stop: looper.stop_handle(),
        };

        looper.run(&mut transport).unwrap();
        assert_eq!(transport.processed, 3);

        unsafe {
            libc::close(read_fd);
            libc::close(write_fd);
        }
    }

    #[test]
    fn stopped_loop_does_not_wait_for_readiness() {
        let (read_fd, write_fd) = pipe();

        let looper = DispatchLoop::new();
        looper.stop_handle().stop();
        let mut transport = PipeTransport {
            read_fd,
            processed: 0,
            limit: usize::MAX,
            stop: looper.stop_handle(),
        };

        // The pipe is empty; a running loop would block in poll forever.
        looper.run(&mut transport).unwrap();
        assert_eq!(transport.processed, 0);

        unsafe {
            libc::close(read_fd);
            libc::close(write_fd);
        }
    }
}
