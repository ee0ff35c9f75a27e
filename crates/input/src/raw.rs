//! Non-blocking byte reads.

use std::io::{self, Read};

use tracing::trace;

/// Bytes read per call; anything beyond stays queued for the next frame.
pub const INPUT_BUFFER_SIZE: usize = 64;

/// Reads whatever is currently available from `R` without blocking.
///
/// `R` is expected to be non-blocking (see [`RawInput::stdin`]); a read that
/// would block, fails, or hits end of input yields an empty slice.
pub struct RawInput<R: Read> {
    reader: R,
    buf: [u8; INPUT_BUFFER_SIZE],
}

impl<R: Read> RawInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: [0; INPUT_BUFFER_SIZE],
        }
    }

    /// One read; returns the bytes received, possibly none.
    pub fn read_available(&mut self) -> &[u8] {
        match self.reader.read(&mut self.buf) {
            Ok(n) => {
                if n > 0 {
                    trace!(bytes = n, "input");
                }
                &self.buf[..n]
            }
            Err(err) => {
                if err.kind() != io::ErrorKind::WouldBlock && err.kind() != io::ErrorKind::Interrupted {
                    trace!(error = %err, "input read failed");
                }
                &[]
            }
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }
}

#[cfg(unix)]
pub use self::unix::NonBlocking;

#[cfg(unix)]
impl RawInput<NonBlocking<io::Stdin>> {
    /// Stdin switched to non-blocking mode until the reader is dropped.
    pub fn stdin() -> io::Result<Self> {
        Ok(Self::new(NonBlocking::new(io::stdin())?))
    }
}

#[cfg(unix)]
mod unix {
    use std::io::{self, Read};
    use std::os::fd::{AsFd, AsRawFd};

    use nix::fcntl::{fcntl, FcntlArg, OFlag};

    /// A file descriptor with `O_NONBLOCK` set; the previous flags come back
    /// on drop.
    pub struct NonBlocking<F: AsFd> {
        inner: F,
        saved_flags: OFlag,
    }

    impl<F: AsFd> NonBlocking<F> {
        pub fn new(inner: F) -> io::Result<Self> {
            let fd = inner.as_fd().as_raw_fd();
            let saved_flags = OFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFL)?);
            fcntl(fd, FcntlArg::F_SETFL(saved_flags | OFlag::O_NONBLOCK))?;
            Ok(Self { inner, saved_flags })
        }

        pub fn get_ref(&self) -> &F {
            &self.inner
        }
    }

    impl<F: AsFd> Read for NonBlocking<F> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            // Straight to the fd: io::Stdin's own buffer would hold bytes back.
            Ok(nix::unistd::read(self.inner.as_fd().as_raw_fd(), buf)?)
        }
    }

    impl<F: AsFd> Drop for NonBlocking<F> {
        fn drop(&mut self) {
            let fd = self.inner.as_fd().as_raw_fd();
            if let Err(err) = fcntl(fd, FcntlArg::F_SETFL(self.saved_flags)) {
                tracing::warn!(error = %err, "failed to restore fd flags");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct WouldBlock;

    impl Read for WouldBlock {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::ErrorKind::WouldBlock.into())
        }
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "boom"))
        }
    }

    #[test]
    fn test_reads_available_bytes() {
        let mut input = RawInput::new(Cursor::new(b"hjkl".to_vec()));
        assert_eq!(input.read_available(), b"hjkl");
        assert_eq!(input.read_available(), b"");
    }

    #[test]
    fn test_caps_read_at_buffer_size() {
        let data = vec![b'x'; INPUT_BUFFER_SIZE + 10];
        let mut input = RawInput::new(Cursor::new(data));
        assert_eq!(input.read_available().len(), INPUT_BUFFER_SIZE);
        assert_eq!(input.read_available().len(), 10);
    }

    #[test]
    fn test_would_block_is_empty() {
        let mut input = RawInput::new(WouldBlock);
        assert!(input.read_available().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_blocking_fd_reads_what_is_queued() {
        use std::io::Write;
        use std::os::fd::AsRawFd;
        use std::os::unix::net::UnixStream;

        use nix::fcntl::{fcntl, FcntlArg, OFlag};

        let (reader, mut writer) = UnixStream::pair().unwrap();
        {
            let mut input = RawInput::new(NonBlocking::new(&reader).unwrap());
            // Nothing queued: returns immediately instead of blocking.
            assert!(input.read_available().is_empty());

            writer.write_all(b"\x1b[A").unwrap();
            assert_eq!(input.read_available(), b"\x1b[A");
            assert!(input.read_available().is_empty());
        }

        let flags = OFlag::from_bits_truncate(fcntl(reader.as_raw_fd(), FcntlArg::F_GETFL).unwrap());
        assert!(!flags.contains(OFlag::O_NONBLOCK));
    }

    #[test]
    fn test_error_is_empty() {
        let mut input = RawInput::new(Failing);
        assert!(input.read_available().is_empty());
    }
}
