use std::{
    collections::BTreeMap,
    io::Write,
    sync::Mutex,
    time::SystemTime,
};

use serde::ser::{Serialize, Serializer};

use crate::{
    format::Record,
    sink::{Scope, Severity, Sink},
    Error,
};

/**
A sink that writes newline-delimited CLEF.

Pairs are written as top-level properties of the event.
*/
pub struct Clef<W> {
    out: Mutex<W>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    #[serde(rename = "@t")]
    timestamp: Timestamp,

    #[serde(rename = "@l")]
    level: &'static str,

    #[serde(rename = "@m")]
    message: &'a str,

    subsystem: &'a str,

    category: &'a str,

    // Everything else
    #[serde(flatten)]
    additional: BTreeMap<&'a str, &'a str>,
}

#[derive(Debug)]
struct Timestamp(SystemTime);

impl Timestamp {
    fn now() -> Self {
        Timestamp(SystemTime::now())
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&humantime::format_rfc3339(self.0))
    }
}

impl<'a> Message<'a> {
    fn new(scope: &'a Scope, severity: Severity, message: &'a str) -> Self {
        Message {
            timestamp: Timestamp::now(),
            level: level(severity),
            message,
            subsystem: &scope.subsystem,
            category: &scope.category,
            additional: BTreeMap::new(),
        }
    }
}

// These are the standard Syslog levels
fn level(severity: Severity) -> &'static str {
    match severity {
        Severity::Default => "notice",
        Severity::Info => "info",
        Severity::Debug => "debug",
        Severity::Error => "err",
        Severity::Fault => "crit",
    }
}

impl<W> Clef<W>
where
    W: Write + Send,
{
    pub fn new(out: W) -> Self {
        Clef {
            out: Mutex::new(out),
        }
    }

    /**
    Take back the underlying writer.
    */
    pub fn into_inner(self) -> Result<W, Error> {
        self.out
            .into_inner()
            .map_err(|_| anyhow!("the CLEF writer is poisoned"))
    }

    fn write(&self, msg: &Message) -> Result<(), Error> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow!("the CLEF writer is poisoned"))?;

        serde_json::to_writer(&mut *out, msg)?;
        out.write_all(b"\n")?;
        out.flush()?;

        Ok(())
    }
}

impl<W> Sink for Clef<W>
where
    W: Write + Send,
{
    fn emit(&self, scope: &Scope, severity: Severity, message: &str) -> Result<(), Error> {
        self.write(&Message::new(scope, severity, message))
    }

    fn emit_structured(&self, scope: &Scope, record: &Record) -> Result<(), Error> {
        let mut msg = Message::new(scope, record.severity, record.message);

        for pair in &record.pairs {
            msg.additional.insert(pair.key, &pair.value);
        }

        self.write(&msg)
    }
}
