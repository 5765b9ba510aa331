#[cfg(unix)]
pub fn test() {
    use std::{
        process::{self, Command},
        thread,
        time::Duration,
    };

    use tokio::{io::AsyncWriteExt, runtime};

    use crate::support::*;

    let (mut writer, reader) = tokio::io::duplex(1024);

    let mut server = server::builder().build(reader);

    let rt = runtime::Builder::new_current_thread()
        .build()
        .expect("failed to build runtime");

    rt.block_on(writer.write_all(b"before\n"))
        .expect("failed to write request");

    server.receive(|received| {
        assert_eq!("before", received["message"]);
    });

    // Give the server a moment to start listening for signals again
    thread::sleep(Duration::from_millis(200));

    let status = Command::new("kill")
        .arg("-TERM")
        .arg(process::id().to_string())
        .status()
        .expect("failed to send SIGTERM");
    assert!(status.success());

    // The input is still open, so the server only stops on the signal
    let remaining = server.finish();
    assert!(remaining.is_empty());

    drop(writer);
}

#[cfg(not(unix))]
pub fn test() {}
