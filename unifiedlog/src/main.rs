use std::process;

use clap::Parser;

use unifiedlog::{
    diagnostics::{self, emit, emit_debug, emit_err},
    plugin,
    receive,
    server,
    sink,
    Config,
    Error,
};

/**
Command-line arguments.

Anything set here takes precedence over the environment.
*/
#[derive(Parser, Debug)]
#[command(name = "unifiedlog-ext")]
#[command(about = "Writes osquery logs to a structured log sink", long_about = None)]
struct Args {
    /// The path to the osquery extensions socket. Requests are read from stdin instead
    #[arg(long)]
    socket: Option<String>,

    /// The extension timeout in seconds, passed by osquery
    #[arg(long = "timeout", hide = true)]
    _timeout: Option<u64>,

    /// The extension interval in seconds, passed by osquery
    #[arg(long = "interval", hide = true)]
    _interval: Option<u64>,

    /// The logger plugin name, passed by osquery
    #[arg(long = "name", hide = true)]
    _name: Option<String>,

    /// The subsystem to log under
    #[arg(long)]
    subsystem: Option<String>,

    /// Write a structured record of the fields in each result and snapshot
    #[arg(long)]
    structured: bool,

    /// Where to write logs: `clef`, `text` or `none`
    #[arg(long)]
    sink: Option<sink::Kind>,

    /// Write debug diagnostics to stderr
    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(subsystem) = self.subsystem {
            config.plugin.subsystem = subsystem;
        }

        if self.structured {
            config.plugin.structured = true;
        }

        if let Some(kind) = self.sink {
            config.sink.kind = kind;
        }

        if self.verbose {
            config.diagnostics.min_level = diagnostics::Level::Debug;
        }
    }
}

fn main() {
    let args = Args::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            emit_err(&err, "Failed to read configuration");
            process::exit(1);
        }
    };

    let ignored_socket = args.socket.is_some();
    args.apply(&mut config);

    diagnostics::init(config.diagnostics.clone());

    if ignored_socket {
        emit_debug("Ignoring the extensions socket; log requests are read from stdin");
    }

    let result = run(config);

    if let Err(err) = diagnostics::stop() {
        emit_err(&err, "Failed to stop diagnostics");
    }

    if let Err(err) = result {
        emit_err(&err, "Unified log extension failed");
        process::exit(1);
    }
}

fn run(config: Config) -> Result<(), Error> {
    let sink = sink::build(config.sink);
    let plugin = plugin::build(config.plugin, sink);

    let server = server::build(
        config.server,
        tokio::io::stdin(),
        |line| receive::decode(&line),
        move |request| plugin.handle(request),
    )?;

    server.run()?;

    emit("Unified log extension stopped");

    Ok(())
}
