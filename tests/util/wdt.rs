use {
    super::TestResult,
    color_eyre::eyre::bail,
    std::{sync::mpsc, thread, time::Duration},
};

const TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the test on its own thread and fails it if it doesn't finish in time.
pub fn run_under_watchdog(f: impl (FnOnce() -> TestResult) + Send + 'static) -> TestResult {
    let (tx, rx) = mpsc::sync_channel(1);
    thread::Builder::new()
        .name("test-body".to_owned())
        .spawn(move || {
            let _ = tx.send(f());
        })?;
    match rx.recv_timeout(TIMEOUT) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => bail!("test timed out after {TIMEOUT:?}"),
        Err(mpsc::RecvTimeoutError::Disconnected) => bail!("test body panicked"),
    }
}
