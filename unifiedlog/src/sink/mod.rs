/*!
Log sinks.

A sink receives flat messages and structured records from named loggers.
It owns the final shape of its output, along with any visibility or
redaction policy. Records never carry more than `format::MAX_PAIRS` pairs.
*/

pub mod clef;
pub mod text;

use std::{fmt, io, str::FromStr, sync::Arc};

use crate::{format::Record, Error};

pub use self::{clef::Clef, text::Text};

/**
The severity of a log event.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Default,
    Info,
    Debug,
    Error,
    Fault,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Default
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Default => "default",
            Severity::Info => "info",
            Severity::Debug => "debug",
            Severity::Error => "error",
            Severity::Fault => "fault",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Severity::Default),
            "info" => Ok(Severity::Info),
            "debug" => Ok(Severity::Debug),
            "error" => Ok(Severity::Error),
            "fault" => Ok(Severity::Fault),
            _ => Err(anyhow!("unrecognized severity {:?}", s)),
        }
    }
}

/**
The subsystem and category a logger writes under.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    pub subsystem: String,
    pub category: String,
}

impl Scope {
    pub fn new(subsystem: impl Into<String>, category: impl Into<String>) -> Self {
        Scope {
            subsystem: subsystem.into(),
            category: category.into(),
        }
    }
}

/**
A destination for log events.
*/
pub trait Sink: Send + Sync {
    /**
    Write a flat message.
    */
    fn emit(&self, scope: &Scope, severity: Severity, message: &str) -> Result<(), Error>;

    /**
    Write a record along with its pairs.
    */
    fn emit_structured(&self, scope: &Scope, record: &Record) -> Result<(), Error>;
}

/**
A sink that discards everything.

This stands in for a native log facility on platforms that don't have one.
*/
#[derive(Debug, Clone, Copy, Default)]
pub struct Noop;

impl Sink for Noop {
    fn emit(&self, _: &Scope, _: Severity, _: &str) -> Result<(), Error> {
        Ok(())
    }

    fn emit_structured(&self, _: &Scope, _: &Record) -> Result<(), Error> {
        Ok(())
    }
}

/**
The kind of sink to write to.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /**
    CLEF events on `stdout`.
    */
    Clef,
    /**
    Lines of plain text on `stdout`.
    */
    Text,
    /**
    Nowhere.
    */
    None,
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clef" => Ok(Kind::Clef),
            "text" => Ok(Kind::Text),
            "none" | "noop" => Ok(Kind::None),
            _ => Err(anyhow!("unrecognized sink {:?}; expected `clef`, `text` or `none`", s)),
        }
    }
}

/**
Sink configuration.
*/
#[derive(Debug, Clone)]
pub struct Config {
    pub kind: Kind,
}

impl Default for Config {
    fn default() -> Self {
        Config { kind: Kind::Clef }
    }
}

/**
Build the configured sink.
*/
pub fn build(config: Config) -> Arc<dyn Sink> {
    match config.kind {
        Kind::Clef => Arc::new(Clef::new(io::stdout())),
        Kind::Text => Arc::new(Text::new(io::stdout())),
        Kind::None => Arc::new(Noop),
    }
}
