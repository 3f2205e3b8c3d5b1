//! In-memory [`Log`] used by unit tests.
use std::sync::Mutex;

use super::types::Log;

/// A single captured log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Stage(String),
    Info(String),
    Debug(String),
    Warn(String),
    Error(String),
    DryRun(String),
}

macro_rules! capture_log_methods {
    ($($method:ident => $variant:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                if let Ok(mut guard) = self.entries.lock() {
                    guard.push(LogEntry::$variant(msg.to_string()));
                }
            }
        )+
    };
}

/// Records every message in order instead of printing it.
#[derive(Debug, Default)]
pub struct CapturedLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl CapturedLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries captured so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Messages logged at error level.
    pub fn errors(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                LogEntry::Error(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }
}

impl Log for CapturedLog {
    capture_log_methods!(
        stage => Stage,
        info => Info,
        debug => Debug,
        warn => Warn,
        error => Error,
        dry_run => DryRun,
    );
}
