use std::{
    io::Cursor,
    marker::Unpin,
    sync::Arc,
    thread,
    time::Duration,
};

use crossbeam_channel::{
    self,
    Receiver,
};

use serde_json::Value;

use tokio::io::AsyncRead;

use unifiedlog::{
    plugin,
    receive,
    server,
};

use super::sink::Capture;

pub struct Builder {
    structured: bool,
    max_line_bytes: usize,
}

impl Builder {
    fn new() -> Self {
        Builder {
            structured: false,
            max_line_bytes: 1024,
        }
    }

    pub fn structured(mut self, v: bool) -> Self {
        self.structured = v;
        self
    }

    pub fn max_line_bytes(mut self, v: usize) -> Self {
        self.max_line_bytes = v;
        self
    }

    pub fn build(self, input: impl AsyncRead + Send + Unpin + 'static) -> Server {
        Server::new(
            server::Config {
                max_line_bytes: self.max_line_bytes,
            },
            plugin::Config {
                structured: self.structured,
                subsystem: "com.test.unifiedlog".into(),
            },
            input,
        )
    }
}

pub struct Server {
    server: thread::JoinHandle<()>,
    handle: server::Handle,
    rx: Receiver<Value>,
}

pub fn builder() -> Builder {
    Builder::new()
}

/**
Join lines into an input stream.
*/
pub fn input(lines: Vec<Vec<u8>>) -> Cursor<Vec<u8>> {
    let mut input = Vec::new();

    for line in lines {
        input.extend(line);
        input.push(b'\n');
    }

    Cursor::new(input)
}

impl Server {
    fn new(
        config: server::Config,
        plugin_config: plugin::Config,
        input: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();

        let plugin = plugin::build(plugin_config, Arc::new(Capture(tx)));

        let mut server = server::build(
            config,
            input,
            |line| receive::decode(&line),
            move |request| plugin.handle(request),
        )
        .expect("failed to build server");

        let handle = server.take_handle().expect("no server handle");
        let server = thread::spawn(move || server.run().expect("failed to run server"));

        Server {
            server,
            handle,
            rx,
        }
    }

    pub fn receive(&mut self, f: impl FnOnce(Value)) {
        let msg = self
            .rx
            .recv_timeout(Duration::from_secs(3))
            .expect("failed to receive an event");

        f(msg)
    }

    /**
    Wait for the server to reach the end of its input and return
    any events it wrote that haven't been received yet.
    */
    pub fn finish(self) -> Vec<Value> {
        let Server { server, handle, rx } = self;

        server.join().expect("failed to run server");
        drop(handle);

        rx.try_iter().collect()
    }

    /**
    Close the server before the end of its input.
    */
    pub fn close(self) -> Vec<Value> {
        let Server { server, handle, rx } = self;

        handle.close();
        server.join().expect("failed to run server");

        rx.try_iter().collect()
    }
}
