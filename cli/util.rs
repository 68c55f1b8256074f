use pipeio::{Error, Stage};
use std::io;

/// Parses permission bits given in octal, with or without a `0o` prefix.
pub fn parse_mode(s: &str) -> Result<libc::mode_t, String> {
    let digits = s.strip_prefix("0o").unwrap_or(s);
    let mode = u32::from_str_radix(digits, 8).map_err(|e| format!("'{s}' is not an octal mode: {e}"))?;
    if mode > 0o7777 {
        return Err(format!("'{s}' has bits outside of 0o7777"));
    }
    libc::mode_t::try_from(mode).map_err(|e| e.to_string())
}

pub trait ResultExt<T> {
    fn or_stdout_err(self) -> pipeio::Result<T>;
}
impl<T> ResultExt<T> for io::Result<T> {
    fn or_stdout_err(self) -> pipeio::Result<T> {
        self.map_err(Error::at(Stage::WriteStdout))
    }
}
