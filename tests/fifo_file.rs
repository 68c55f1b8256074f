use {
    super::util::*,
    crate::{create_fifo, receive_once, send_once, Stage, CHUNK_SIZE},
    color_eyre::eyre::ensure,
    std::{fs, io::Cursor, os::unix::fs::FileTypeExt, thread},
};

#[test]
fn create() -> TestResult {
    test_wrapper(|| {
        let dir = scratch_dir()?;
        let path = dir.path().join("fifo");
        create_fifo(&path, 0o600)?;
        ensure!(fs::metadata(&path)?.file_type().is_fifo(), "not a FIFO");

        let err = create_fifo(&path, 0o600).unwrap_err();
        ensure_eq!(err.stage(), Some(Stage::CreateNamedPipe));
        Ok(())
    })
}

#[test]
fn send_and_receive() -> TestResult {
    test_wrapper(|| {
        let dir = scratch_dir()?;
        let path = dir.path().join("fifo");
        create_fifo(&path, 0o600)?;

        let rpath = path.clone();
        let receiver = thread::spawn(move || receive_once(rpath));

        let mut prompted = false;
        let sent = send_once(&path, Cursor::new(b"ping"), || prompted = true)?;
        ensure_eq!(sent, 4);
        ensure!(prompted, "prompt was not shown");

        let received = receiver.join().expect("receiver panicked")?;
        ensure_eq!(received, b"ping".to_vec());
        Ok(())
    })
}

#[test]
fn one_chunk_at_most() -> TestResult {
    test_wrapper(|| {
        let dir = scratch_dir()?;
        let path = dir.path().join("fifo");
        create_fifo(&path, 0o600)?;

        let rpath = path.clone();
        let receiver = thread::spawn(move || receive_once(rpath));

        let input = payload(3 * CHUNK_SIZE, "fifo-chunk");
        let sent = send_once(&path, Cursor::new(input.clone()), || ())?;
        ensure_eq!(sent, CHUNK_SIZE);

        let received = receiver.join().expect("receiver panicked")?;
        ensure_same_bytes(&input[..CHUNK_SIZE], &received)
    })
}

#[test]
fn empty_input_reads_as_end_of_stream() -> TestResult {
    test_wrapper(|| {
        let _guard = no_forks();
        let dir = scratch_dir()?;
        let path = dir.path().join("fifo");
        create_fifo(&path, 0o600)?;

        let rpath = path.clone();
        let receiver = thread::spawn(move || receive_once(rpath));
        ensure_eq!(send_once(&path, Cursor::new(Vec::new()), || ())?, 0);

        let received = receiver.join().expect("receiver panicked")?;
        ensure!(received.is_empty(), "received {received:?}");
        Ok(())
    })
}

#[test]
fn missing_fifo() -> TestResult {
    test_wrapper(|| {
        let dir = scratch_dir()?;
        let err = receive_once(dir.path().join("missing")).unwrap_err();
        ensure_eq!(err.stage(), Some(Stage::OpenNamedPipe));
        Ok(())
    })
}
