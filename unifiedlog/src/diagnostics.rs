/*!
Self-diagnostics.

Diagnostic events are written to `stderr` as CLEF so they can't be confused with
log output written to `stdout` by a sink.
*/

use std::{
    fmt::Display,
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc,
        Mutex,
    },
    thread,
    time::Duration,
};

use chrono::{DateTime, Utc};

use serde_json::{Map, Value};

use crate::Error;

/**
Declare a set of counters for the enclosing module.

Counters are reset each time they're collected.
*/
macro_rules! metrics {
    ($($metric:ident),+) => {
        #[allow(non_upper_case_globals)]
        pub(crate) mod metrics {
            use std::sync::atomic::{AtomicUsize, Ordering};

            $(
                pub(crate) static $metric: AtomicUsize = AtomicUsize::new(0);
            )+

            pub(crate) fn take() -> Vec<(&'static str, usize)> {
                vec![
                    $(
                        (stringify!($metric), $metric.swap(0, Ordering::Relaxed))
                    ),+
                ]
            }
        }
    };
}

/**
Increment a counter declared with `metrics!`.
*/
macro_rules! increment {
    ($module:ident . $metric:ident) => {
        $crate::$module::metrics::$metric.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
    };
}

/**
Configuration for self-diagnostics.
*/
#[derive(Debug, Clone)]
pub struct Config {
    /**
    The minimum level of events to write.
    */
    pub min_level: Level,
    /**
    How often to write a snapshot of the collected metrics.

    Metrics are only written when `min_level` is `Debug`.
    */
    pub metrics_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_level: Level::Info,
            metrics_interval_ms: 60 * 1000, // 1 minute
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Level {
    #[serde(rename = "DEBUG")]
    Debug,
    #[serde(rename = "INFO")]
    Info,
    #[serde(rename = "ERROR")]
    Error,
}

impl Level {
    fn from_usize(level: usize) -> Self {
        match level {
            0 => Level::Debug,
            1 => Level::Info,
            _ => Level::Error,
        }
    }
}

static MIN_LEVEL: AtomicUsize = AtomicUsize::new(Level::Info as usize);

lazy_static! {
    static ref METRICS: Mutex<Option<Metrics>> = Mutex::new(None);
}

struct Metrics {
    stop: mpsc::Sender<()>,
    handle: thread::JoinHandle<()>,
}

impl Metrics {
    fn start(interval: Duration) -> Self {
        let (stop, rx) = mpsc::channel();

        let handle = thread::spawn(move || loop {
            match rx.recv_timeout(interval) {
                Err(mpsc::RecvTimeoutError::Timeout) => emit_metrics(),
                // Either a stop signal or the sender was dropped
                // Flush whatever has been collected since the last snapshot
                _ => {
                    emit_metrics();
                    return;
                }
            }
        });

        Metrics { stop, handle }
    }

    fn stop(self) -> Result<(), Error> {
        drop(self.stop);

        self.handle
            .join()
            .map_err(|_| anyhow!("the metrics thread panicked"))
    }
}

#[derive(Serialize)]
struct DiagnosticEvent<'a> {
    #[serde(rename = "@t")]
    timestamp: DateTime<Utc>,

    #[serde(rename = "@l")]
    level: Level,

    #[serde(rename = "@mt")]
    message_template: &'static str,

    #[serde(rename = "@x")]
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<Map<String, Value>>,
}

impl<'a> DiagnosticEvent<'a> {
    fn new(
        level: Level,
        error: Option<&'a str>,
        message_template: &'static str,
    ) -> DiagnosticEvent<'a> {
        DiagnosticEvent {
            timestamp: Utc::now(),
            level,
            message_template,
            error,
            metrics: None,
        }
    }
}

/**
Start writing diagnostics.
*/
pub fn init(config: Config) {
    MIN_LEVEL.store(config.min_level as usize, Ordering::Relaxed);

    if config.min_level == Level::Debug {
        let metrics = Metrics::start(Duration::from_millis(config.metrics_interval_ms));

        if let Ok(mut current) = METRICS.lock() {
            if let Some(previous) = current.replace(metrics) {
                if let Err(err) = previous.stop() {
                    emit_err(&err, "Failed to stop the previous metrics thread");
                }
            }
        }
    }
}

/**
Stop writing diagnostics, flushing any metrics collected so far.
*/
pub fn stop() -> Result<(), Error> {
    let metrics = METRICS
        .lock()
        .map_err(|_| anyhow!("the diagnostics state is poisoned"))?
        .take();

    if let Some(metrics) = metrics {
        metrics.stop()?;
    }

    Ok(())
}

pub fn emit(message_template: &'static str) {
    write(DiagnosticEvent::new(Level::Info, None, message_template));
}

pub fn emit_debug(message_template: &'static str) {
    write(DiagnosticEvent::new(Level::Debug, None, message_template));
}

pub fn emit_err(error: &impl Display, message_template: &'static str) {
    let err_str = format!("{}", error);

    write(DiagnosticEvent::new(Level::Error, Some(&err_str), message_template));
}

fn emit_metrics() {
    let collected = [
        ("format", crate::format::metrics::take()),
        ("plugin", crate::plugin::metrics::take()),
        ("server", crate::server::metrics::take()),
    ];

    let mut metrics = Map::new();
    for (module, counters) in collected.iter() {
        for (name, count) in counters {
            metrics.insert(format!("{}.{}", module, name), (*count).into());
        }
    }

    let mut evt = DiagnosticEvent::new(Level::Debug, None, "Collected metrics");
    evt.metrics = Some(metrics);

    write(evt);
}

fn enabled(level: Level) -> bool {
    level >= Level::from_usize(MIN_LEVEL.load(Ordering::Relaxed))
}

fn write(evt: DiagnosticEvent) {
    if !enabled(evt.level) {
        return;
    }

    if let Ok(json) = serde_json::to_string(&evt) {
        eprintln!("{}", json);
    }
}
