//! Copying a file by relaying its bytes through an unnamed pipe between two flows.
//!
//! A producer reads the source in [`CHUNK_SIZE`] chunks and writes them into the pipe; a consumer
//! reads from the pipe and writes into the destination. The pipe is the only thing the two flows
//! share. Its bounded kernel buffer is what keeps them in step: a full pipe blocks the producer, an
//! empty one blocks the consumer until the producer closes the writing end, at which point the
//! consumer sees end-of-stream and finishes. The coordinator returns only after the consumer has
//! finished and closed the destination.
//!
//! Two ways of splitting into flows are provided, selected with [`SplitMode`]:
//! - [`Fork`](SplitMode::Fork) forks a child process to act as the consumer. Its exit status is
//!   the completion signal, and a failure in it is reported as [`Stage::Consumer`] with the OS
//!   error it exited with.
//! - [`Thread`](SplitMode::Thread) runs the consumer on a scoped thread and joins it.
//!
//! Any error aborts the copy. A partially written destination is left in place.
//!
//! ## `SIGPIPE`
//! When the consumer fails, the producer's next write goes to a pipe with no reader. The copy
//! functions expect that write to fail with `EPIPE`, which is what happens under the Rust runtime's
//! default of ignoring `SIGPIPE`. A program that restores the default disposition (for example
//! with `libc::signal(libc::SIGPIPE, libc::SIG_DFL)`) is instead killed by the signal when its
//! consumer fails.

use crate::{
    chunk::{pump, Side, CHUNK_SIZE},
    os::unix::{
        c_wrappers::{self, Forked},
        file_ops::{close_destination, open_destination, DEFAULT_CREATE_MODE},
    },
    path_to_cstring,
    unnamed_pipe::{pipe, UnnamedPipeReader, UnnamedPipeWriter},
    CannotUnwind, Error, Result, Stage,
};
use libc::c_int;
use std::{
    ffi::CStr,
    fs::File,
    io::{self, Read, Write},
    os::fd::AsRawFd,
    path::Path,
    thread,
};
use tracing::{debug, info};

/// How the coordinator splits into a producer and a consumer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SplitMode {
    /// The consumer is a forked child process; the parent waits for it to exit.
    #[default]
    Fork,
    /// The consumer is a thread of the calling process; the caller joins it.
    Thread,
}

/// Builder for a piped copy.
#[derive(Copy, Clone, Debug, Default)]
pub struct PipedCopy {
    split: SplitMode,
}
impl PipedCopy {
    /// Creates a builder with the default [`SplitMode`].
    pub fn new() -> Self {
        Self::default()
    }
    /// Sets how the copy splits into flows.
    #[must_use]
    pub fn split(mut self, split: SplitMode) -> Self {
        self.split = split;
        self
    }

    /// Copies `src` into `dst` through a pipe, returning the number of bytes copied.
    ///
    /// The source is opened before the pipe is created, so a missing source fails before the
    /// destination is created or truncated. The destination is opened by the consumer:
    /// write-only, created with mode `0644` (before the umask) if missing, truncated otherwise.
    ///
    /// Requires `SIGPIPE` to be ignored; see the [module-level documentation](self).
    pub fn copy<P: AsRef<Path>, Q: AsRef<Path>>(self, src: P, dst: Q) -> Result<u64> {
        let (src, dst) = (src.as_ref(), dst.as_ref());
        let source = File::open(src).map_err(Error::at(Stage::OpenSource))?;
        debug!(src = %src.display(), dst = %dst.display(), split = ?self.split, "starting piped copy");

        let copied = match self.split {
            SplitMode::Fork => copy_forked(source, dst)?,
            SplitMode::Thread => relay_then(source, || open_destination(dst), close_destination)?.0,
        };
        info!(src = %src.display(), dst = %dst.display(), bytes = copied, "piped copy finished");
        Ok(copied)
    }
}

/// Copies `src` into `dst` through a pipe with the default [`SplitMode`]. See
/// [`PipedCopy::copy`].
///
/// Requires `SIGPIPE` to be ignored; see the [module-level documentation](self).
pub fn copy_via_pipe<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<u64> {
    PipedCopy::new().copy(src, dst)
}

/// Relays everything readable from `source` into the writer returned by `open_dest`, through an
/// unnamed pipe, with the consumer on a scoped thread.
///
/// `open_dest` runs on the consumer thread. Returns the number of bytes relayed together with the
/// flushed writer. If the consumer fails, its error is returned in preference to the
/// [`BrokenPipe`](io::ErrorKind::BrokenPipe) the producer gets as a result.
pub fn relay<R, W, F>(source: R, open_dest: F) -> Result<(u64, W)>
where
    R: Read,
    W: Write + Send,
    F: FnOnce() -> Result<W> + Send,
{
    relay_then(source, open_dest, Ok)
}

/// [`relay`], with `finish` consuming the flushed writer on the consumer thread before it
/// terminates.
fn relay_then<R, W, T, F, G>(source: R, open_dest: F, finish: G) -> Result<(u64, T)>
where
    R: Read,
    W: Write,
    T: Send,
    F: FnOnce() -> Result<W> + Send,
    G: FnOnce(W) -> Result<T> + Send,
{
    let (writer, reader) = pipe().map_err(Error::at(Stage::CreatePipe))?;
    thread::scope(|scope| {
        let consumer = thread::Builder::new()
            .name("pipe-consumer".to_owned())
            .spawn_scoped(scope, move || consume(reader, open_dest, finish))
            .map_err(Error::at(Stage::Fork))?;

        let produced = produce(source, writer);
        let consumed = match consumer.join() {
            Ok(consumed) => consumed,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        let (relayed, dest) = consumed?;
        let produced = produced?;
        debug!(produced, relayed, "consumer joined");
        Ok((produced, dest))
    })
}

/// The producer: source → pipe. Both are closed on return, which is what lets the consumer see
/// end-of-stream.
fn produce(mut source: impl Read, writer: UnnamedPipeWriter) -> Result<u64> {
    let mut buf = [0; CHUNK_SIZE];
    pump(&mut source, &writer, &mut buf).map_err(|(side, e)| match side {
        Side::Read => Error::io(Stage::ReadSource, e),
        Side::Write => Error::io(Stage::WritePipe, e),
    })
}

/// The consumer of the threaded split: pipe → destination.
fn consume<W: Write, T>(
    reader: UnnamedPipeReader,
    open_dest: impl FnOnce() -> Result<W>,
    finish: impl FnOnce(W) -> Result<T>,
) -> Result<(u64, T)> {
    let mut dest = open_dest()?;
    let mut buf = [0; CHUNK_SIZE];
    let relayed = pump(&reader, &mut dest, &mut buf).map_err(|(side, e)| match side {
        Side::Read => Error::io(Stage::ReadPipe, e),
        Side::Write => Error::io(Stage::WriteDestination, e),
    })?;
    drop(reader);
    dest.flush().map_err(Error::at(Stage::WriteDestination))?;
    Ok((relayed, finish(dest)?))
}

fn copy_forked(source: File, dst: &Path) -> Result<u64> {
    // Built before the fork: the child must not allocate.
    let cdst = path_to_cstring(dst)?;
    let fd_limit = c_wrappers::fd_limit();
    let (writer, reader) = pipe().map_err(Error::at(Stage::CreatePipe))?;

    // SAFETY: the child branch below only performs raw system calls on a stack buffer and ends
    // in _exit, never returning into the caller.
    let pid = match unsafe { c_wrappers::fork() }.map_err(Error::at(Stage::Fork))? {
        Forked::Child => {
            let _guard = CannotUnwind::begin();
            drop(writer);
            drop(source);
            // Other threads' pipes are inherited too. Holding their writing ends would keep
            // their consumers from ever seeing end-of-stream.
            c_wrappers::close_all_except(reader.as_raw_fd(), fd_limit);
            let code = match consume_in_child(reader, &cdst) {
                Ok(()) => 0,
                Err(e) => child_exit_code(&e),
            };
            c_wrappers::exit_immediately(code)
        }
        Forked::Parent(pid) => pid,
    };
    drop(reader);
    debug!(pid, "forked consumer");

    let produced = produce(source, writer);
    let status = c_wrappers::wait_for(pid).map_err(Error::at(Stage::Wait))?;
    check_consumer_status(status)?;
    produced
}

/// The consumer of the forked split. Everything in here must stay async-signal-safe.
fn consume_in_child(reader: UnnamedPipeReader, dst: &CStr) -> io::Result<()> {
    let flags = libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC;
    let dest = File::from(c_wrappers::open_raw(dst, flags, DEFAULT_CREATE_MODE)?);
    let mut buf = [0; CHUNK_SIZE];
    pump(&reader, &dest, &mut buf).map_err(|(_, e)| e)?;
    drop(reader);
    c_wrappers::close(dest.into())
}

/// A failed child exits with its errno; anything without one becomes `EIO`.
fn child_exit_code(e: &io::Error) -> c_int {
    match e.raw_os_error() {
        Some(code) if (1..=255).contains(&code) => code,
        _ => libc::EIO,
    }
}

fn check_consumer_status(status: c_int) -> Result<()> {
    if libc::WIFEXITED(status) {
        match libc::WEXITSTATUS(status) {
            0 => Ok(()),
            code => Err(Error::io(Stage::Consumer, io::Error::from_raw_os_error(code))),
        }
    } else if libc::WIFSIGNALED(status) {
        Err(Error::ConsumerSignaled(libc::WTERMSIG(status)))
    } else {
        Err(Error::io(
            Stage::Wait,
            io::Error::other(format!("unexpected wait status {status:#x}")),
        ))
    }
}
