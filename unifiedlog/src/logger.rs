/*!
Named loggers.

Each logger writes to a sink under a fixed subsystem and category. The set of
loggers is created once at startup and shared by reference after that.
*/

use std::{collections::HashMap, sync::Arc};

use crate::{
    format,
    sink::{Scope, Severity, Sink},
    Error,
};

pub const RESULTS: &str = "results";
pub const SNAPSHOTS: &str = "snapshots";
pub const STATUS: &str = "status";

/**
A logger for a single category.
*/
#[derive(Clone)]
pub struct Logger {
    scope: Scope,
    sink: Arc<dyn Sink>,
}

impl Logger {
    pub fn new(scope: Scope, sink: Arc<dyn Sink>) -> Self {
        Logger { scope, sink }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /**
    Write a message as-is.
    */
    pub fn log(&self, severity: Severity, msg: &str) -> Result<(), Error> {
        self.sink.emit(&self.scope, severity, msg)
    }

    /**
    Write a message, along with a structured record of its fields if it has any.

    Structured records are in addition to the raw message, not a replacement
    for it. The raw message is always written exactly once, even if writing
    the structured record fails.
    */
    pub fn log_structured(&self, severity: Severity, msg: &str) -> Result<(), Error> {
        let record = format::format(msg, severity);

        let structured = if record.is_structured() {
            self.sink.emit_structured(&self.scope, &record)
        } else {
            Ok(())
        };

        let raw = self.log(severity, msg);

        structured.and(raw)
    }
}

/**
The set of loggers for a process, keyed by category.
*/
#[derive(Clone)]
pub struct Loggers {
    loggers: HashMap<String, Logger>,
}

impl Loggers {
    /**
    Create loggers for the `results`, `snapshots` and `status` categories.
    */
    pub fn new(subsystem: &str, sink: Arc<dyn Sink>) -> Self {
        Loggers::with_categories(subsystem, &[RESULTS, SNAPSHOTS, STATUS], sink)
    }

    pub fn with_categories(subsystem: &str, categories: &[&str], sink: Arc<dyn Sink>) -> Self {
        let loggers = categories
            .iter()
            .map(|category| {
                let logger = Logger::new(Scope::new(subsystem, *category), sink.clone());

                (category.to_string(), logger)
            })
            .collect();

        Loggers { loggers }
    }

    pub fn get(&self, category: &str) -> Result<&Logger, Error> {
        self.loggers
            .get(category)
            .ok_or_else(|| anyhow!("no logger is registered for the {:?} category", category))
    }
}
