//! Test utilities for scratch directories, payload generation and running blocking pipe tests
//! under a watchdog.
#![allow(dead_code, unused_macros)]

#[macro_use]
mod eyre;
mod wdt;
mod xorshift;

#[allow(unused_imports)]
pub use {eyre::*, xorshift::*};

use {
    color_eyre::eyre::WrapErr,
    std::{
        path::Path,
        sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    },
    tempfile::TempDir,
};

pub fn test_wrapper(f: impl (FnOnce() -> TestResult) + Send + 'static) -> TestResult {
    eyre::install();
    self::wdt::run_under_watchdog(f)
}

pub fn scratch_dir() -> TestResult<TempDir> {
    tempfile::Builder::new()
        .prefix("pipeio-test-")
        .tempdir()
        .context("scratch directory creation failed")
}

/// Deterministic pseudorandom bytes, different for every `id`.
pub fn payload(len: usize, id: &str) -> Vec<u8> {
    let mut rng = Xorshift32::from_id(id);
    (0..len).map(|_| rng.next() as u8).collect()
}

pub fn write_payload(path: &Path, len: usize, id: &str) -> TestResult<Vec<u8>> {
    let data = payload(len, id);
    std::fs::write(path, &data).with_context(|| format!("writing {}", path.display()))?;
    Ok(data)
}

/// Between `fork` and closing what it inherited, a consumer child briefly holds copies of every
/// descriptor in the process. Forking tests share this lock; tests that watch a pipe end close
/// take it exclusively.
static FORK_LOCK: RwLock<()> = RwLock::new(());
pub fn fork_lock() -> RwLockReadGuard<'static, ()> {
    FORK_LOCK.read().unwrap_or_else(PoisonError::into_inner)
}
pub fn no_forks() -> RwLockWriteGuard<'static, ()> {
    FORK_LOCK.write().unwrap_or_else(PoisonError::into_inner)
}

/// Like `ensure_eq!` for byte buffers, but reports the first differing offset instead of dumping
/// both buffers.
pub fn ensure_same_bytes(expected: &[u8], actual: &[u8]) -> TestResult {
    if let Some(pos) = expected.iter().zip(actual).position(|(a, b)| a != b) {
        color_eyre::eyre::bail!("contents differ at offset {pos}");
    }
    ensure_eq!(expected.len(), actual.len(), "lengths differ");
    Ok(())
}
