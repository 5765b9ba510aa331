use std::{
    marker::Unpin,
    time::Duration,
};

use futures::{
    future::{self, BoxFuture},
    select,
    FutureExt,
    StreamExt,
};

use tokio::{
    io::AsyncRead,
    runtime::Runtime,
    signal::ctrl_c,
    sync::oneshot,
};

use tokio_util::codec::{
    Decoder,
    FramedRead,
    LinesCodec,
    LinesCodecError,
};

use anyhow::Error;

use bytes::BytesMut;

use crate::{
    diagnostics::*,
    receive::Request,
};

metrics! {
    receive_ok,
    receive_err,
    process_ok,
    process_err,
    line_overflow
}

/**
Server configuration.
*/
#[derive(Debug, Clone)]
pub struct Config {
    /**
    The maximum size of a single line before it'll be discarded.
    */
    pub max_line_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_line_bytes: 1024 * 1024, // 1MiB
        }
    }
}

/**
A server that reads logger requests from an input stream.
*/
pub struct Server {
    fut: BoxFuture<'static, ()>,
    handle: Option<Handle>,
}

impl Server {
    pub fn take_handle(&mut self) -> Option<Handle> {
        self.handle.take()
    }

    /**
    Run the server until its input is exhausted or it's asked to stop.
    */
    pub fn run(self) -> Result<(), Error> {
        // Run the server on a fresh runtime
        // We attempt to shut this runtime down cleanly to release
        // any used resources
        let runtime = Runtime::new()?;

        runtime.block_on(self.fut);

        // Reads from stdin happen on a blocking thread that can't be interrupted,
        // so don't wait on it forever
        runtime.shutdown_timeout(Duration::from_secs(1));

        Ok(())
    }
}

/**
A handle to a running server that can be used to interact with it
programmatically.
*/
pub struct Handle {
    close: oneshot::Sender<()>,
}

impl Handle {
    /**
    Close the server.
    */
    pub fn close(self) -> bool {
        self.close.send(()).is_ok()
    }
}

/**
Build a server to read logger requests and process them.
*/
pub fn build(
    config: Config,
    input: impl AsyncRead + Send + Unpin + 'static,
    receive: impl FnMut(String) -> Result<Option<Request>, Error> + Send + Unpin + 'static,
    mut process: impl FnMut(Request) -> Result<(), Error> + Send + 'static,
) -> Result<Server, Error> {
    if config.max_line_bytes == 0 {
        bail!("the maximum line size must be greater than zero");
    }

    emit("Starting unified log server");

    let (handle_tx, handle_rx) = oneshot::channel();

    // Build a handle
    let handle = Some(Handle { close: handle_tx });

    let server = async move {
        let incoming = FramedRead::new(input, Decode::new(config.max_line_bytes, receive));

        let mut close = handle_rx.fuse();
        let mut ctrl_c = ctrl_c().boxed().fuse();
        let mut terminate = terminate().boxed().fuse();
        let mut incoming = incoming.fuse();

        // NOTE: We don't use `?` here because we never want to carry results
        // We always want to match them and deal with error cases directly
        loop {
            select! {
                // A request that's ready to process
                msg = incoming.next() => match msg {
                    // A complete request has been received
                    Some(Ok(Received::Complete(request))) => {
                        increment!(server.receive_ok);

                        // Process the received request
                        match process(request) {
                            Ok(()) => {
                                increment!(server.process_ok);
                            }
                            Err(err) => {
                                increment!(server.process_err);
                                emit_err(&err, "Log processing failed");
                            }
                        }
                    },
                    // A blank line has been received
                    Some(Ok(Received::Incomplete)) => {
                        continue;
                    },
                    // An error occurred decoding a line
                    Some(Ok(Received::Error(err))) => {
                        increment!(server.receive_err);
                        emit_err(&err, "Log request decoding failed");
                        continue;
                    },
                    // An unrecoverable error occurred reading the input
                    Some(Err(err)) => {
                        increment!(server.receive_err);
                        emit_err(&err, "Reading log requests failed irrecoverably");
                        break;
                    },
                    // The input has been closed
                    None => {
                        emit("Input closed; shutting down");
                        break;
                    },
                },
                // A termination signal from the programmatic handle
                closed = close => match closed {
                    Ok(()) => {
                        emit("Handle closed; shutting down");
                        break;
                    },
                    // The handle was dropped without being used
                    Err(_) => {
                        continue;
                    },
                },
                // A termination signal from the environment
                _ = ctrl_c => {
                    emit("Termination signal received; shutting down");
                    break;
                },
                _ = terminate => {
                    emit("Termination signal received; shutting down");
                    break;
                },
            };
        }

        emit("Stopping unified log server");
    };

    Ok(Server {
        fut: Box::pin(server),
        handle,
    })
}

/**
Wait for a `SIGTERM`.
*/
#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            terminate.recv().await;
        }
        Err(err) => {
            emit_err(&err, "Failed to listen for termination signals");
            future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    future::pending::<()>().await;
}

#[derive(Debug)]
enum Received {
    Incomplete,
    Complete(Request),
    Error(Error),
}

trait OptionRequestExt {
    fn into_received(self) -> Received;
}

impl OptionRequestExt for Result<Option<Request>, Error> {
    fn into_received(self) -> Received {
        match self {
            Ok(Some(request)) => Received::Complete(request),
            Ok(None) => Received::Incomplete,
            Err(err) => Received::Error(err),
        }
    }
}

/**
Splits input into lines and decodes each one into a request.

A line that's too long is reported and skipped, rather than ending the stream.
*/
struct Decode<F> {
    lines: LinesCodec,
    receive: F,
}

impl<F> Decode<F>
where
    F: FnMut(String) -> Result<Option<Request>, Error>,
{
    fn new(max_line_bytes: usize, receive: F) -> Self {
        Decode {
            lines: LinesCodec::new_with_max_length(max_line_bytes),
            receive,
        }
    }

    fn received(
        &mut self,
        line: Result<Option<String>, LinesCodecError>,
    ) -> Result<Option<Received>, Error> {
        match line {
            Ok(Some(line)) => Ok(Some((self.receive)(line).into_received())),
            // As per the contract of `Decoder`, we return `None`
            // here to indicate more data is needed to complete a frame
            Ok(None) => Ok(None),
            // The codec discards the rest of the line itself
            Err(LinesCodecError::MaxLineLengthExceeded) => {
                increment!(server.line_overflow);

                Ok(Some(Received::Error(anyhow!(
                    "a line exceeded the maximum size of {} bytes",
                    self.lines.max_length()
                ))))
            }
            Err(LinesCodecError::Io(err)) => Err(err.into()),
        }
    }
}

impl<F> Decoder for Decode<F>
where
    F: FnMut(String) -> Result<Option<Request>, Error>,
{
    type Item = Received;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let line = self.lines.decode(src);

        self.received(line)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let line = self.lines.decode_eof(src);

        self.received(line)
    }
}
