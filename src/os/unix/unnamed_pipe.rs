use super::{unixprelude::*, FdOps};
use crate::unnamed_pipe::{UnnamedPipeReader as PubReader, UnnamedPipeWriter as PubWriter};
use crate::OrErrno;
use std::io;

pub(crate) fn pipe() -> io::Result<(PubWriter, PubReader)> {
    let (success, fds) = unsafe {
        let mut fds: [c_int; 2] = [0; 2];
        let result = libc::pipe(fds.as_mut_ptr());
        (result == 0, fds)
    };
    if success {
        let [r, w] = fds;
        let (w, r) = unsafe {
            // SAFETY: we just created both of those file descriptors, which means that neither of
            // them can be in use elsewhere.
            (OwnedFd::from_raw_fd(w), OwnedFd::from_raw_fd(r))
        };
        set_cloexec(&w)?;
        set_cloexec(&r)?;
        let w = PubWriter(UnnamedPipeWriter(FdOps(w)));
        let r = PubReader(UnnamedPipeReader(FdOps(r)));
        Ok((w, r))
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Keeps the ends out of programs spawned through `exec`.
fn set_cloexec(fd: &OwnedFd) -> io::Result<()> {
    let ret = unsafe { libc::fcntl(fd.as_raw_fd(), libc::F_SETFD, libc::FD_CLOEXEC) };
    (ret != -1).true_val_or_errno(())
}

pub(crate) struct UnnamedPipeReader(FdOps);
multimacro! {
    UnnamedPipeReader,
    forward_sync_read,
    forward_fd,
}

pub(crate) struct UnnamedPipeWriter(FdOps);
multimacro! {
    UnnamedPipeWriter,
    forward_sync_write,
    forward_fd,
}
