use super::unixprelude::*;
use crate::{FdOrErrno, OrErrno};
use std::{ffi::CStr, io};

pub(crate) fn mknod_regular(path: &CStr, mode: mode_t) -> io::Result<()> {
    unsafe { libc::mknod(path.as_ptr(), libc::S_IFREG | mode, 0) != -1 }.true_val_or_errno(())
}

pub(crate) fn mkfifo(path: &CStr, mode: mode_t) -> io::Result<()> {
    unsafe { libc::mkfifo(path.as_ptr(), mode) != -1 }.true_val_or_errno(())
}

/// Opens a file without allocating, which makes it usable in a freshly forked child.
pub(crate) fn open_raw(path: &CStr, flags: c_int, mode: mode_t) -> io::Result<OwnedFd> {
    let fd = unsafe { libc::open(path.as_ptr(), flags | libc::O_CLOEXEC, mode as libc::c_uint) }
        .fd_or_errno()?;
    // SAFETY: we just created this file descriptor, so nothing else can own it.
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}

/// Closes the descriptor and reports the error that dropping an `OwnedFd` would swallow.
///
/// `EINTR` is not retried: on Linux the descriptor is released even when `close` is interrupted,
/// and a second `close` could hit an unrelated descriptor that reused the number.
pub(crate) fn close(fd: OwnedFd) -> io::Result<()> {
    let fd = fd.into_raw_fd();
    if unsafe { libc::close(fd) } == 0 {
        return Ok(());
    }
    let e = io::Error::last_os_error();
    match e.kind() {
        io::ErrorKind::Interrupted => Ok(()),
        _ => Err(e),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Forked {
    Parent(pid_t),
    Child,
}

/// # Safety
/// If the calling process has more than one thread, the child may only perform
/// async-signal-safe operations until it calls `_exit`: no allocation, no locking, no
/// unwinding.
pub(crate) unsafe fn fork() -> io::Result<Forked> {
    match unsafe { libc::fork() } {
        -1 => Err(io::Error::last_os_error()),
        0 => Ok(Forked::Child),
        pid => Ok(Forked::Parent(pid)),
    }
}

/// Upper bound on descriptor numbers, for [`close_all_except`]. Must be queried before forking,
/// since `sysconf` is not async-signal-safe.
pub(crate) fn fd_limit() -> c_int {
    let max = unsafe { libc::sysconf(libc::_SC_OPEN_MAX) };
    match c_int::try_from(max) {
        Ok(max) if max > 0 => max,
        _ => 1024,
    }
}

/// Closes every descriptor above standard error except `keep`. Async-signal-safe.
///
/// Errors are ignored, since most numbers below `limit` are not open.
pub(crate) fn close_all_except(keep: RawFd, limit: c_int) {
    let first = libc::STDERR_FILENO + 1;
    if close_range(first, keep - 1) && close_range((keep + 1).max(first), c_int::MAX) {
        return;
    }
    for fd in (first..limit).filter(|&fd| fd != keep) {
        unsafe { libc::close(fd) };
    }
}

/// Closes `first..=last` in one system call, returning `false` if the kernel lacks `close_range`.
#[cfg(target_os = "linux")]
fn close_range(first: c_int, last: c_int) -> bool {
    if first > last {
        return true;
    }
    #[allow(clippy::cast_sign_loss)]
    let (first, last) = (first as libc::c_uint, last as libc::c_uint);
    let zero: libc::c_uint = 0;
    unsafe { libc::syscall(libc::SYS_close_range, first, last, zero) == 0 }
}
#[cfg(not(target_os = "linux"))]
fn close_range(_first: c_int, _last: c_int) -> bool {
    false
}

/// Blocks until the given child terminates, returning its raw wait status.
pub(crate) fn wait_for(pid: pid_t) -> io::Result<c_int> {
    let mut status: c_int = 0;
    loop {
        let ret = unsafe { libc::waitpid(pid, &mut status, 0) };
        if ret != -1 {
            return Ok(status);
        }
        let e = io::Error::last_os_error();
        if e.kind() != io::ErrorKind::Interrupted {
            return Err(e);
        }
    }
}

/// Terminates the calling process without running destructors, atexit handlers or stdio
/// flushes, all of which belong to the parent in a forked child.
pub(crate) fn exit_immediately(code: c_int) -> ! {
    unsafe { libc::_exit(code) }
}
