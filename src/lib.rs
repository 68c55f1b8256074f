#![doc = include_str!("../README.md")]
// If this was in Cargo.toml, it would cover the binary as well
#![warn(
    missing_docs,
    clippy::panic_in_result_fn,
    clippy::missing_assert_message,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

#[cfg(not(unix))]
compile_error!("pipeio only supports Unix-like systems");

#[macro_use]
mod macros;

mod chunk;
pub mod error;
pub mod piped_copy;
pub mod unnamed_pipe;

/// Platform-specific functionality. Only Unix is supported.
pub mod os {
    pub mod unix;
}

pub use {
    chunk::CHUNK_SIZE,
    error::{Error, Result, Stage},
    os::unix::{
        fifo_file::{create_fifo, receive_once, send_once},
        file_ops::{copy_file, create_file, read_at, write_at, FileInfo},
    },
    piped_copy::{copy_via_pipe, relay, PipedCopy, SplitMode},
};

mod misc;
pub(crate) use misc::*;

use std::{ffi::CString, os::unix::ffi::OsStrExt, path::Path};

pub(crate) fn path_to_cstring(path: &Path) -> Result<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| Error::InvalidArgument(format!("path {} contains a nul byte", path.display())))
}

#[cfg(test)]
#[path = "../tests/index.rs"]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects, clippy::indexing_slicing)]
mod tests;
