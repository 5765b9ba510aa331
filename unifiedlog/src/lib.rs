/*!
An osquery logger that forwards results, snapshots and status logs to a structured log sink.

The logger is split into a few main components, in order of where they appear in the
processing of a log line:

- **Server**: A small `tokio` loop that reads line-delimited logger requests from an input stream.
- **Receive**: Decodes each line into an osquery logger request.
- **Plugin**: Routes each request to the named logger for its category.
- **Format**: Extracts a bounded set of well-known fields from JSON log lines so they can be
emitted as a structured record alongside the raw line.
- **Sink**: Writes the resulting records somewhere. Sinks are injected, so a platform without
a native log facility can swap in a no-op.
*/

#![deny(unsafe_code)]

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate anyhow;

#[macro_use]
pub mod diagnostics;

pub mod config;
pub mod format;
pub mod logger;
pub mod plugin;
pub mod receive;
pub mod server;
pub mod sink;

pub use self::{anyhow::Error, config::Config};
