//! Operations on regular files: creation with explicit permissions, positioned reads and writes,
//! metadata inspection and a direct chunked copy.

use super::{c_wrappers, unixprelude::*};
use crate::{
    chunk::{pump, Side, CHUNK_SIZE},
    path_to_cstring, Error, Result, Stage,
};
use std::{
    fmt::{self, Display, Formatter},
    fs::{self, File, OpenOptions},
    io,
    os::unix::fs::{FileExt, MetadataExt, OpenOptionsExt},
    path::Path,
};
use tracing::{debug, info};

/// Permissions given to destination files created by copies, before the umask.
pub const DEFAULT_CREATE_MODE: mode_t = 0o644;

/// Creates an empty regular file with the given permissions, failing if anything already exists
/// at `path`. The permissions are masked with the umask.
///
/// ## System calls
/// - [`mknod`](https://pubs.opengroup.org/onlinepubs/9699919799/functions/mknod.html)
pub fn create_file<P: AsRef<Path>>(path: P, mode: mode_t) -> Result<()> {
    let path = path.as_ref();
    let cpath = path_to_cstring(path)?;
    c_wrappers::mknod_regular(&cpath, mode).map_err(Error::at(Stage::CreateFile))?;
    debug!(path = %path.display(), mode = %format!("{mode:o}"), "created regular file");
    Ok(())
}

/// Reads up to `size` bytes starting at `offset` with a single positioned read.
///
/// The result is shorter than `size` if the read was short, and empty if `offset` is at or past
/// the end of the file.
pub fn read_at<P: AsRef<Path>>(path: P, offset: u64, size: usize) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(Error::at(Stage::OpenFile))?;

    let mut buf = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|e| Error::io(Stage::Allocate, io::Error::new(io::ErrorKind::OutOfMemory, e)))?;
    buf.resize(size, 0);

    let n = file.read_at(&mut buf, offset).map_err(Error::at(Stage::ReadFile))?;
    buf.truncate(n);
    debug!(path = %path.display(), offset, requested = size, read = n, "positioned read");
    Ok(buf)
}

/// Writes `data` at `offset` into an existing file with a single positioned write, returning
/// the number of bytes written. The file is not created if it doesn't exist.
pub fn write_at<P: AsRef<Path>>(path: P, offset: u64, data: &[u8]) -> Result<usize> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(Error::at(Stage::OpenFile))?;
    let n = file.write_at(data, offset).map_err(Error::at(Stage::WriteFile))?;
    debug!(path = %path.display(), offset, requested = data.len(), written = n, "positioned write");
    Ok(n)
}

/// Metadata of a file, as reported by `stat`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    /// User ID of the owner.
    pub owner: u32,
    /// Permission bits, without the file type and without setuid/setgid/sticky.
    pub permissions: u32,
    /// Inode number.
    pub inode: u64,
    /// Last access time, in seconds since the Unix epoch.
    pub accessed: i64,
    /// Last modification time, in seconds since the Unix epoch.
    pub modified: i64,
    /// Last status change time, in seconds since the Unix epoch.
    pub changed: i64,
}
impl FileInfo {
    /// Queries the metadata of the file at `path`, following symlinks.
    pub fn query<P: AsRef<Path>>(path: P) -> Result<Self> {
        let meta = fs::metadata(path).map_err(Error::at(Stage::Stat))?;
        Ok(Self {
            owner: meta.uid(),
            permissions: meta.mode() & 0o777,
            inode: meta.ino(),
            accessed: meta.atime(),
            modified: meta.mtime(),
            changed: meta.ctime(),
        })
    }
}
impl Display for FileInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Owner: {}", self.owner)?;
        writeln!(f, "Permissions: {:o}", self.permissions)?;
        writeln!(f, "Inode: {}", self.inode)?;
        writeln!(f, "Last Access Time: {}", self.accessed)?;
        writeln!(f, "Last Modification Time: {}", self.modified)?;
        write!(f, "Last Status Change Time: {}", self.changed)
    }
}

/// Opens a copy destination: write-only, created with [`DEFAULT_CREATE_MODE`] if missing,
/// truncated otherwise.
pub(crate) fn open_destination(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(u32::from(DEFAULT_CREATE_MODE))
        .open(path)
        .map_err(Error::at(Stage::OpenDestination))
}

/// Closes a destination file, surfacing errors that `drop` would discard.
pub(crate) fn close_destination(file: File) -> Result<()> {
    c_wrappers::close(OwnedFd::from(file)).map_err(Error::at(Stage::CloseDestination))
}

/// Copies the content of `src` into `dst` directly, [`CHUNK_SIZE`] bytes at a time, returning the
/// number of bytes copied.
///
/// The source is opened first, so a missing source leaves `dst` untouched. The destination is
/// created if missing and truncated otherwise.
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<u64> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    let source = File::open(src).map_err(Error::at(Stage::OpenSource))?;
    let destination = open_destination(dst)?;

    let mut buf = [0; CHUNK_SIZE];
    let copied = pump(&source, &destination, &mut buf).map_err(|(side, e)| match side {
        Side::Read => Error::io(Stage::ReadSource, e),
        Side::Write => Error::io(Stage::WriteDestination, e),
    })?;
    close_destination(destination)?;

    info!(src = %src.display(), dst = %dst.display(), bytes = copied, "direct copy finished");
    Ok(copied)
}
