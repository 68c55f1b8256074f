//! Fixed-size chunked transfer between a reader and a writer.
//!
//! Both halves of a piped copy, the direct copy and the named pipe helpers move data through
//! here. A transfer moves at most [`CHUNK_SIZE`] bytes per round trip; a short write is an error
//! rather than something to retry.

use std::io::{self, Read, Write};

/// Capacity of the per-flow transfer buffer.
pub const CHUNK_SIZE: usize = 4096;

/// Which side of a transfer failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Read,
    Write,
}

/// Reads once, retrying only if the call was interrupted before transferring anything.
pub(crate) fn read_chunk(mut from: impl Read, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match from.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            els => return els,
        }
    }
}

/// Writes the whole of `buf` in a single call. A short write is reported as
/// [`WriteZero`](io::ErrorKind::WriteZero).
///
/// Doesn't allocate, not even for the error.
pub(crate) fn write_chunk(mut to: impl Write, buf: &[u8]) -> io::Result<()> {
    let written = loop {
        match to.write(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            els => break els?,
        }
    };
    if written == buf.len() {
        Ok(())
    } else {
        Err(io::Error::from(io::ErrorKind::WriteZero))
    }
}

/// Moves everything from `from` to `to` through `buf` until `from` reports end-of-stream,
/// returning the number of bytes moved.
pub(crate) fn pump(
    mut from: impl Read,
    mut to: impl Write,
    buf: &mut [u8],
) -> Result<u64, (Side, io::Error)> {
    let mut total = 0_u64;
    loop {
        let n = read_chunk(&mut from, buf).map_err(|e| (Side::Read, e))?;
        if n == 0 {
            return Ok(total);
        }
        #[allow(clippy::indexing_slicing)] // n <= buf.len()
        write_chunk(&mut to, &buf[..n]).map_err(|e| (Side::Write, e))?;
        total = total.saturating_add(n as u64);
    }
}
