//! Creation and usage of unnamed pipes.
//!
//! An unnamed pipe only exists as a pair of file descriptors: bytes written to the
//! [writing end](UnnamedPipeWriter) come out of the [reading end](UnnamedPipeReader) in the same
//! order, without any message boundaries. Once every copy of the writing end is closed, reads
//! drain what is left and then return 0 to signal end-of-stream.
//!
//! Unnamed pipes work best when a child process or thread is used. With the fork model, the
//! descriptors are transferred to the child process thanks to the cloned address space, and each
//! side must close the end it does not use – a forgotten writing end keeps the reader from ever
//! seeing end-of-stream. With threads, moving each end into the flow that uses it achieves the
//! same thing.

use crate::os::unix::unnamed_pipe::{
    pipe as pipe_impl, UnnamedPipeReader as UnnamedPipeReaderImpl,
    UnnamedPipeWriter as UnnamedPipeWriterImpl,
};
use std::io;

/// Creates a new pipe and returns the handles to its writing end and reading end.
///
/// ## System calls
/// - [`pipe`](https://pubs.opengroup.org/onlinepubs/9699919799/functions/pipe.html)
pub fn pipe() -> io::Result<(UnnamedPipeWriter, UnnamedPipeReader)> {
    pipe_impl()
}

/// A handle to the reading end of an unnamed pipe, created by the [`pipe()`] function together
/// with the [writing end](UnnamedPipeWriter).
///
/// The core functionality is exposed in a file-like [`Read`](io::Read) interface. The descriptor
/// is closed on drop, or can be taken out as an [`OwnedFd`](std::os::fd::OwnedFd).
// field is pub(crate) to allow the platform-specific constructor to create the public-facing pipe types
pub struct UnnamedPipeReader(pub(crate) UnnamedPipeReaderImpl);
multimacro! {
    UnnamedPipeReader,
    forward_sync_read,
    forward_fd,
    forward_debug("UnnamedPipeReader"),
}

/// A handle to the writing end of an unnamed pipe, created by the [`pipe()`] function together
/// with the [reading end](UnnamedPipeReader).
///
/// The core functionality is exposed in a file-like [`Write`](io::Write) interface. Flushing is a
/// no-op since nothing is buffered in userspace.
pub struct UnnamedPipeWriter(pub(crate) UnnamedPipeWriterImpl);
multimacro! {
    UnnamedPipeWriter,
    forward_sync_write,
    forward_fd,
    forward_debug("UnnamedPipeWriter"),
}
