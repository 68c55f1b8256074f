//! Unix-specific functionality: FIFO files, operations on regular files, and the system call
//! wrappers the rest of the crate is built on.
//!
//! ## FIFO files
//! This type of interprocess communication is similar to unnamed pipes in that FIFO files are
//! unidirectional byte channels which behave like files. The difference is that FIFO files are
//! actual (pseudo)files on the filesystem and thus can be accessed by unrelated applications (one
//! doesn't need to be spawned by another).

pub(crate) mod c_wrappers;
mod fdops;
pub mod fifo_file;
pub mod file_ops;
pub(crate) mod unnamed_pipe;

pub(crate) use fdops::*;

mod unixprelude {
    #[allow(unused_imports)]
    pub(super) use libc::{c_int, mode_t, pid_t};
    #[allow(unused_imports)]
    pub(super) use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};
}
