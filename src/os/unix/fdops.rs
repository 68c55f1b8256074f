use super::unixprelude::*;
use std::io::{self, prelude::*};

/// An owned file descriptor which performs I/O through raw `read` and `write` calls.
#[repr(transparent)]
pub(crate) struct FdOps(pub(crate) OwnedFd);
impl Read for &FdOps {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let length_to_read = buf.len();

        let (success, bytes_read) = unsafe {
            let size_or_err = libc::read(self.0.as_raw_fd(), buf.as_mut_ptr().cast(), length_to_read);
            (size_or_err >= 0, size_or_err as usize)
        };
        ok_or_ret_errno!(success => bytes_read)
    }
}
impl Write for &FdOps {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let length_to_write = buf.len();

        let (success, bytes_written) = unsafe {
            let size_or_err = libc::write(self.0.as_raw_fd(), buf.as_ptr().cast(), length_to_write);
            (size_or_err >= 0, size_or_err as usize)
        };
        ok_or_ret_errno!(success => bytes_written)
    }
    // Nothing is buffered on our side, and fsync() on a pipe fails with EINVAL.
    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl AsFd for FdOps {
    #[inline]
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.0.as_fd()
    }
}
impl From<FdOps> for OwnedFd {
    #[inline]
    fn from(x: FdOps) -> Self {
        x.0
    }
}
impl From<OwnedFd> for FdOps {
    #[inline]
    fn from(fd: OwnedFd) -> Self {
        Self(fd)
    }
}
