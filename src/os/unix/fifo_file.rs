//! Creating and using FIFO files, also known as named pipes.
//!
//! FIFO files are files which can have a writer and a reader communicating with each other in one
//! direction without message boundaries. Unlike unnamed pipes, they live on the filesystem, so two
//! unrelated processes can connect through a known path.
//!
//! ## Usage
//! The [`create_fifo`] function creates a FIFO file. Opening one blocks until the other side has
//! opened it too, which is why [`send_once`] and [`receive_once`] block until a peer shows up.
//! Deleting works the same way as with any regular file, via
//! [`remove_file`](std::fs::remove_file).

use super::{c_wrappers, unixprelude::*};
use crate::{
    chunk::{read_chunk, write_chunk, CHUNK_SIZE},
    path_to_cstring, Error, Result, Stage,
};
use std::{fs::OpenOptions, io::Read, path::Path};
use tracing::debug;

/// Creates a FIFO file at the specified path with the specified permissions.
///
/// Since the `mode` parameter is masked with the [`umask`], the resulting permissions may be
/// narrower than requested.
///
/// ## System calls
/// - [`mkfifo`]
///
/// [`mkfifo`]: https://pubs.opengroup.org/onlinepubs/9699919799/functions/mkfifo.html
/// [`umask`]: https://en.wikipedia.org/wiki/Umask
pub fn create_fifo<P: AsRef<Path>>(path: P, mode: mode_t) -> Result<()> {
    _create_fifo(path.as_ref(), mode)
}
fn _create_fifo(path: &Path, mode: mode_t) -> Result<()> {
    let cpath = path_to_cstring(path)?;
    c_wrappers::mkfifo(&cpath, mode).map_err(Error::at(Stage::CreateNamedPipe))?;
    debug!(path = %path.display(), mode = %format!("{mode:o}"), "created FIFO");
    Ok(())
}

/// Performs one read of up to [`CHUNK_SIZE`] bytes from `input` and writes exactly those bytes
/// into the FIFO at `path`, returning how many there were.
///
/// Opening the FIFO blocks until a reader opens it. `prompt` is invoked after the FIFO is open
/// and right before `input` is read, so that an interactive caller can ask for the data at the
/// moment it is wanted.
pub fn send_once<P: AsRef<Path>>(
    path: P,
    input: impl Read,
    prompt: impl FnOnce(),
) -> Result<usize> {
    _send_once(path.as_ref(), input, prompt)
}
fn _send_once(path: &Path, input: impl Read, prompt: impl FnOnce()) -> Result<usize> {
    let fifo = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(Error::at(Stage::OpenNamedPipe))?;
    debug!(path = %path.display(), "FIFO opened for writing");

    prompt();
    let mut buf = [0; CHUNK_SIZE];
    let n = read_chunk(input, &mut buf).map_err(Error::at(Stage::ReadStdin))?;
    #[allow(clippy::indexing_slicing)] // n <= CHUNK_SIZE
    write_chunk(&fifo, &buf[..n]).map_err(Error::at(Stage::WriteNamedPipe))?;
    debug!(bytes = n, "wrote to FIFO");
    Ok(n)
}

/// Opens the FIFO at `path` for reading and performs one read of up to [`CHUNK_SIZE`] bytes.
///
/// Opening blocks until a writer opens the FIFO, and the read blocks until it writes something
/// or closes its end; in the latter case the result is empty.
pub fn receive_once<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    _receive_once(path.as_ref())
}
fn _receive_once(path: &Path) -> Result<Vec<u8>> {
    let fifo = OpenOptions::new()
        .read(true)
        .open(path)
        .map_err(Error::at(Stage::OpenNamedPipe))?;
    debug!(path = %path.display(), "FIFO opened for reading");

    let mut buf = vec![0; CHUNK_SIZE];
    let n = read_chunk(&fifo, &mut buf).map_err(Error::at(Stage::ReadNamedPipe))?;
    buf.truncate(n);
    debug!(bytes = n, "read from FIFO");
    Ok(buf)
}
