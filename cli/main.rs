//! pipeio - POSIX file I/O and pipe communication from the command line.

mod util;

use clap::{Parser, Subcommand, ValueEnum};
use pipeio::{FileInfo, PipedCopy, Result, SplitMode};
use std::{
    ffi::OsString,
    io::{self, Write},
    os::unix::ffi::OsStrExt,
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{debug, Level};
use util::{parse_mode, ResultExt};

#[derive(Parser)]
#[command(name = "pipeio")]
#[command(about = "POSIX file I/O and pipe communication")]
#[command(version)]
struct Cli {
    /// Log verbosity
    #[arg(long, global = true, value_enum, default_value_t = Verbosity::Warn)]
    verbosity: Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty regular file with the given octal permissions
    CreateFile {
        filename: PathBuf,
        #[arg(value_parser = parse_mode)]
        permissions: libc::mode_t,
    },

    /// Print up to SIZE bytes read at OFFSET
    ReadFile {
        filename: PathBuf,
        offset: u64,
        size: usize,
    },

    /// Write DATA at OFFSET into an existing file
    WriteFile {
        filename: PathBuf,
        offset: u64,
        data: OsString,
    },

    /// Print owner, permissions, inode and timestamps of a file
    DisplayFileInfo { filename: PathBuf },

    /// Copy a file directly
    CopyFile {
        source: PathBuf,
        destination: PathBuf,
    },

    /// Copy a file by relaying its content through an unnamed pipe
    CopyFileByPipe {
        source: PathBuf,
        destination: PathBuf,

        /// Run the consumer in a forked process or in a thread
        #[arg(long, value_enum, default_value_t = Split::Fork)]
        split: Split,
    },

    /// Create a named pipe (FIFO) with the given octal permissions
    CreateNamedPipe {
        name: PathBuf,
        #[arg(value_parser = parse_mode)]
        permissions: libc::mode_t,
    },

    /// Perform one read from or one write to a named pipe
    CommunicateThroughPipe {
        name: PathBuf,
        #[arg(value_enum)]
        mode: PipeMode,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Verbosity {
    Debug,
    Info,
    Warn,
    Error,
}
impl From<Verbosity> for Level {
    fn from(v: Verbosity) -> Self {
        match v {
            Verbosity::Debug => Level::DEBUG,
            Verbosity::Info => Level::INFO,
            Verbosity::Warn => Level::WARN,
            Verbosity::Error => Level::ERROR,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Split {
    Fork,
    Thread,
}
impl From<Split> for SplitMode {
    fn from(s: Split) -> Self {
        match s {
            Split::Fork => SplitMode::Fork,
            Split::Thread => SplitMode::Thread,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PipeMode {
    Read,
    Write,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit with 1 like every other failure; --help and --version succeed.
            let _ = e.print();
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    setup_logging(cli.verbosity);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn setup_logging(verbosity: Verbosity) {
    tracing_subscriber::fmt()
        .with_max_level(Level::from(verbosity))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Command) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::CreateFile { filename, permissions } => {
            pipeio::create_file(&filename, permissions)?;
            writeln!(out, "File '{}' created successfully.", filename.display()).or_stdout_err()?;
        }
        Command::ReadFile { filename, offset, size } => {
            let data = pipeio::read_at(&filename, offset, size)?;
            writeln!(out, "Read {} bytes from file '{}':", data.len(), filename.display())
                .and_then(|()| out.write_all(&data))
                .and_then(|()| writeln!(out))
                .or_stdout_err()?;
        }
        Command::WriteFile { filename, offset, data } => {
            let written = pipeio::write_at(&filename, offset, data.as_bytes())?;
            writeln!(
                out,
                "Written {written} bytes to file '{}' at offset {offset}.",
                filename.display()
            )
            .or_stdout_err()?;
        }
        Command::DisplayFileInfo { filename } => {
            let info = FileInfo::query(&filename)?;
            writeln!(out, "File Information for '{}':", filename.display())
                .and_then(|()| writeln!(out, "{info}"))
                .or_stdout_err()?;
        }
        Command::CopyFile { source, destination } => {
            pipeio::copy_file(&source, &destination)?;
            report_copied(&mut out, &source, &destination)?;
        }
        Command::CopyFileByPipe { source, destination, split } => {
            PipedCopy::new().split(split.into()).copy(&source, &destination)?;
            report_copied(&mut out, &source, &destination)?;
        }
        Command::CreateNamedPipe { name, permissions } => {
            pipeio::create_fifo(&name, permissions)?;
            writeln!(out, "Named pipe '{}' created successfully.", name.display()).or_stdout_err()?;
        }
        Command::CommunicateThroughPipe { name, mode: PipeMode::Write } => {
            let mut prompt_result = Ok(());
            let written = pipeio::send_once(&name, io::stdin().lock(), || {
                let max = pipeio::CHUNK_SIZE;
                prompt_result = write!(out, "Enter data to write (max {max} characters): ")
                    .and_then(|()| out.flush());
            })?;
            prompt_result.or_stdout_err()?;
            debug!(written, "sent data through named pipe");
            writeln!(out, "Data is now written to the named pipe.").or_stdout_err()?;
        }
        Command::CommunicateThroughPipe { name, mode: PipeMode::Read } => {
            writeln!(out, "Reading from named pipe '{}'.", name.display())
                .and_then(|()| out.flush())
                .or_stdout_err()?;
            let data = pipeio::receive_once(&name)?;
            writeln!(out, "Data read from named pipe: {}", String::from_utf8_lossy(&data))
                .or_stdout_err()?;
        }
    }
    Ok(())
}

fn report_copied(out: &mut impl Write, source: &Path, destination: &Path) -> Result<()> {
    writeln!(
        out,
        "File '{}' copied to '{}' successfully.",
        source.display(),
        destination.display()
    )
    .or_stdout_err()
}
