/*!
The logger plugin.

Routes each kind of osquery log to the logger for its category.
*/

use std::sync::Arc;

use crate::{
    diagnostics::*,
    logger::{self, Loggers},
    receive::Request,
    sink::{Severity, Sink},
    Error,
};

metrics! {
    string,
    snapshot,
    status,
    init,
    health
}

/**
Plugin configuration.
*/
#[derive(Debug, Clone)]
pub struct Config {
    /**
    The subsystem to log under.
    */
    pub subsystem: String,
    /**
    Whether or not to write a structured record of each result and
    snapshot in addition to its raw JSON.
    */
    pub structured: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            subsystem: "com.osquery.unifiedlog".to_owned(),
            structured: false,
        }
    }
}

/**
The kind of log osquery is writing.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    String,
    Snapshot,
    Status,
}

/**
Build a plugin that writes to the given sink.
*/
pub fn build(config: Config, sink: Arc<dyn Sink>) -> Plugin {
    let loggers = Loggers::new(&config.subsystem, sink);

    Plugin::new(config, loggers)
}

pub struct Plugin {
    structured: bool,
    loggers: Loggers,
}

impl Plugin {
    pub fn new(config: Config, loggers: Loggers) -> Self {
        Plugin {
            structured: config.structured,
            loggers,
        }
    }

    /**
    Write a log.

    Results and snapshots are formatted as structured records when that's enabled.
    Status logs are always written as-is.
    */
    pub fn log(&self, log_type: LogType, msg: &str) -> Result<(), Error> {
        let severity = Severity::Default;

        match log_type {
            LogType::String => {
                increment!(plugin.string);

                self.write(logger::RESULTS, severity, msg, self.structured)
            }
            LogType::Snapshot => {
                increment!(plugin.snapshot);

                self.write(logger::SNAPSHOTS, severity, msg, self.structured)
            }
            LogType::Status => {
                increment!(plugin.status);

                self.write(logger::STATUS, severity, msg, false)
            }
        }
    }

    /**
    Handle a decoded request.
    */
    pub fn handle(&self, request: Request) -> Result<(), Error> {
        match request {
            Request::String(msg) => self.log(LogType::String, &msg),
            Request::Snapshot(msg) => self.log(LogType::Snapshot, &msg),
            Request::Status(entries) => {
                // Write every entry even if an earlier one fails
                let mut result = Ok(());

                for entry in entries {
                    result = result.and(self.log(LogType::Status, &entry));
                }

                result
            }
            Request::Init(_) => {
                increment!(plugin.init);
                emit_debug("Logger plugin initialized");

                Ok(())
            }
            Request::Health => {
                increment!(plugin.health);

                Ok(())
            }
        }
    }

    fn write(
        &self,
        category: &str,
        severity: Severity,
        msg: &str,
        structured: bool,
    ) -> Result<(), Error> {
        let logger = self.loggers.get(category)?;

        if structured {
            logger.log_structured(severity, msg)
        } else {
            logger.log(severity, msg)
        }
    }
}
