//! Command-line tests for the `pipeio` binary: argument handling, exit codes and the output of
//! each operation.

use assert_cmd::Command;
use predicates::prelude::*;
use std::{
    fs,
    io::Read,
    process::{Command as StdCommand, Stdio},
};
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("pipeio").unwrap()
}

fn scratch() -> TempDir {
    tempfile::Builder::new().prefix("pipeio-cli-").tempdir().unwrap()
}

// =============================================================================
// Usage
// =============================================================================

#[test]
fn help_lists_operations() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create-file"))
        .stdout(predicate::str::contains("copy-file-by-pipe"))
        .stdout(predicate::str::contains("communicate-through-pipe"));
}

#[test]
fn no_operation_is_usage_error() {
    cmd().assert().code(1);
}

#[test]
fn unknown_operation_is_usage_error() {
    cmd().arg("frobnicate").assert().code(1);
}

#[test]
fn wrong_argument_count_is_usage_error() {
    cmd().args(["copy-file-by-pipe", "only-source"]).assert().code(1);
    cmd().args(["read-file", "f", "0", "1", "extra"]).assert().code(1);
}

#[test]
fn non_octal_permissions_are_rejected() {
    let dir = scratch();
    let path = dir.path().join("f");
    cmd().arg("create-file").arg(&path).arg("rw-r--r--").assert().code(1);
    assert!(!path.exists());
}

#[test]
fn unknown_pipe_mode_is_rejected() {
    cmd().args(["communicate-through-pipe", "fifo", "append"]).assert().code(1);
}

// =============================================================================
// Piped copy
// =============================================================================

#[test]
fn piped_copy_of_repeating_pattern() {
    let dir = scratch();
    let (src, dst) = (dir.path().join("src"), dir.path().join("dst"));
    let data: Vec<u8> = b"pipeio!".iter().copied().cycle().take(10_000).collect();
    fs::write(&src, &data).unwrap();

    cmd()
        .arg("copy-file-by-pipe")
        .arg(&src)
        .arg(&dst)
        .assert()
        .success()
        .stdout(predicate::str::contains("copied to"))
        .stdout(predicate::str::contains("successfully"));
    assert_eq!(fs::read(&dst).unwrap(), data);
}

#[test]
fn piped_copy_with_thread_split() {
    let dir = scratch();
    let (src, dst) = (dir.path().join("src"), dir.path().join("dst"));
    let data: Vec<u8> = (0..50_000_u32).map(|i| (i * 7 % 256) as u8).collect();
    fs::write(&src, &data).unwrap();

    cmd()
        .args(["copy-file-by-pipe", "--split", "thread"])
        .arg(&src)
        .arg(&dst)
        .assert()
        .success();
    assert_eq!(fs::read(&dst).unwrap(), data);
}

#[test]
fn piped_copy_of_empty_file() {
    let dir = scratch();
    let (src, dst) = (dir.path().join("src"), dir.path().join("dst"));
    fs::write(&src, b"").unwrap();

    cmd().arg("copy-file-by-pipe").arg(&src).arg(&dst).assert().success();
    assert_eq!(fs::metadata(&dst).unwrap().len(), 0);
}

#[test]
fn piped_copy_of_nonexistent_source() {
    let dir = scratch();
    let dst = dir.path().join("dst");

    cmd()
        .arg("copy-file-by-pipe")
        .arg("/nonexistent")
        .arg(&dst)
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error opening source file: "));
    assert!(!dst.exists());
}

#[test]
fn piped_copy_into_missing_directory() {
    let dir = scratch();
    let src = dir.path().join("src");
    fs::write(&src, b"unchanged").unwrap();

    cmd()
        .arg("copy-file-by-pipe")
        .arg(&src)
        .arg(dir.path().join("no-such-dir").join("dst"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("consumer"));
    assert_eq!(fs::read(&src).unwrap(), b"unchanged");
}

// =============================================================================
// Other operations
// =============================================================================

#[test]
fn create_write_read_and_inspect() {
    let dir = scratch();
    let path = dir.path().join("notes");

    cmd()
        .arg("create-file")
        .arg(&path)
        .arg("600")
        .assert()
        .success()
        .stdout(predicate::str::contains("created successfully"));
    cmd()
        .arg("write-file")
        .arg(&path)
        .args(["0", "hello world"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Written 11 bytes"));
    cmd()
        .arg("read-file")
        .arg(&path)
        .args(["6", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Read 5 bytes from file"))
        .stdout(predicate::str::contains("world"));
    cmd()
        .arg("display-file-info")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Permissions: 600"))
        .stdout(predicate::str::contains("Inode: "))
        .stdout(predicate::str::contains("Last Status Change Time: "));
}

#[test]
fn create_file_twice_fails() {
    let dir = scratch();
    let path = dir.path().join("once");
    cmd().arg("create-file").arg(&path).arg("644").assert().success();
    cmd()
        .arg("create-file")
        .arg(&path)
        .arg("644")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error creating file"));
}

#[test]
fn write_file_does_not_create() {
    let dir = scratch();
    let path = dir.path().join("absent");
    cmd().arg("write-file").arg(&path).args(["0", "x"]).assert().code(1);
    assert!(!path.exists());
}

#[test]
fn direct_copy() {
    let dir = scratch();
    let (src, dst) = (dir.path().join("src"), dir.path().join("dst"));
    fs::write(&src, vec![42_u8; 9000]).unwrap();

    cmd().arg("copy-file").arg(&src).arg(&dst).assert().success();
    assert_eq!(fs::read(&dst).unwrap(), vec![42_u8; 9000]);
}

#[test]
fn named_pipe_round_trip() {
    let dir = scratch();
    let fifo = dir.path().join("fifo");
    cmd()
        .arg("create-named-pipe")
        .arg(&fifo)
        .arg("600")
        .assert()
        .success()
        .stdout(predicate::str::contains("Named pipe"));

    let mut reader = StdCommand::new(assert_cmd::cargo::cargo_bin("pipeio"))
        .arg("communicate-through-pipe")
        .arg(&fifo)
        .arg("read")
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    cmd()
        .arg("communicate-through-pipe")
        .arg(&fifo)
        .arg("write")
        .write_stdin("ping")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter data to write (max 4096 characters)"));

    let status = reader.wait().unwrap();
    let mut out = String::new();
    reader.stdout.take().unwrap().read_to_string(&mut out).unwrap();
    assert!(status.success());
    assert!(out.contains("Data read from named pipe: ping"), "{out}");
}
