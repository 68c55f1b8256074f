//! Error types for every operation of the crate.
//!
//! Every failure is an OS-level I/O error tagged with the [`Stage`] at which it happened. Nothing
//! is retried and nothing is cleaned up: a destination that was partially written when the error
//! occurred is left as is.

use std::{fmt, io};
use thiserror::Error;

/// Shorthand for results carrying the crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type of the crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A system call failed.
    #[error("{stage}")]
    Io {
        /// The step that was being performed.
        stage: Stage,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The consumer process of a piped copy was terminated by a signal instead of exiting.
    #[error("Consumer process was killed by signal {0}")]
    ConsumerSignaled(i32),

    /// An argument could not be used as given (non-octal permissions, interior nul byte in a
    /// path, and the like).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Creates an I/O error for the given stage.
    pub fn io(stage: Stage, source: io::Error) -> Self {
        Self::Io { stage, source }
    }

    /// Returns a closure for `map_err` that tags an I/O error with `stage`.
    pub fn at(stage: Stage) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::io(stage, source)
    }

    /// The stage the error is attributed to, if it is an I/O error.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Io { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The underlying OS error, if any.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }

    /// The process exit code corresponding to this error.
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Renders the error together with its chain of causes, one per line.
    pub fn format_detailed(&self) -> String {
        let mut output = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            output.push_str(&format!(": {err}"));
            source = err.source();
        }
        output
    }
}

/// The step of an operation at which an error occurred.
///
/// The `Display` impl produces the message used when reporting the error, in the form
/// "Error *doing something*".
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Stage {
    CreateFile,
    OpenFile,
    Allocate,
    ReadFile,
    WriteFile,
    Stat,
    OpenSource,
    ReadSource,
    OpenDestination,
    WriteDestination,
    CloseDestination,
    CreatePipe,
    Fork,
    ReadPipe,
    WritePipe,
    Wait,
    /// Reported by the consumer of a piped copy through its exit status; the exact step is not
    /// known to the parent.
    Consumer,
    CreateNamedPipe,
    OpenNamedPipe,
    ReadNamedPipe,
    WriteNamedPipe,
    ReadStdin,
    WriteStdout,
}
impl Stage {
    fn message(self) -> &'static str {
        use Stage::*;
        match self {
            CreateFile => "Error creating file",
            OpenFile => "Error opening file",
            Allocate => "Error allocating memory",
            ReadFile => "Error reading file",
            WriteFile => "Error writing to file",
            Stat => "Error getting file information",
            OpenSource => "Error opening source file",
            ReadSource => "Error reading from source file",
            OpenDestination => "Error opening destination file",
            WriteDestination => "Error writing to destination file",
            CloseDestination => "Error closing destination file",
            CreatePipe => "Error creating pipe",
            Fork => "Error forking process",
            ReadPipe => "Error reading from pipe",
            WritePipe => "Error writing to pipe",
            Wait => "Error waiting for child process",
            Consumer => "Error in consumer process",
            CreateNamedPipe => "Error creating named pipe",
            OpenNamedPipe => "Error opening named pipe",
            ReadNamedPipe => "Error reading from named pipe",
            WriteNamedPipe => "Error writing to named pipe",
            ReadStdin => "Error reading from standard input",
            WriteStdout => "Error writing to standard output",
        }
    }
}
impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
