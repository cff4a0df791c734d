use crate::util::format_bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// One structured log line delivered to the observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub category: String,
    pub message: String,
    pub severity: Severity,
    pub file_name: Option<String>,
    pub size_bytes: Option<u64>,
}

impl LogEntry {
    pub fn new(severity: Severity, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            category: category.into(),
            message: message.into(),
            severity,
            file_name: None,
            size_bytes: None,
        }
    }

    pub fn info(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, category, message)
    }

    pub fn success(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Success, category, message)
    }

    pub fn warning(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, category, message)
    }

    pub fn error(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, category, message)
    }

    pub fn with_file(mut self, file_name: impl Into<String>, size_bytes: Option<u64>) -> Self {
        self.file_name = Some(file_name.into());
        self.size_bytes = size_bytes;
        self
    }

    /// Size formatted for display, e.g. `1.50 MB`.
    pub fn display_size(&self) -> Option<String> {
        self.size_bytes.map(format_bytes)
    }
}

/// Receives log entries from the extraction threads.
///
/// Implementations must tolerate calls from any thread; marshalling onto a UI
/// thread is the implementation's job.
pub trait LogSink: Send + Sync {
    fn emit(&self, entry: LogEntry);
}

impl<F> LogSink for F
where
    F: Fn(LogEntry) + Send + Sync,
{
    fn emit(&self, entry: LogEntry) {
        self(entry)
    }
}

impl LogSink for Sender<LogEntry> {
    fn emit(&self, entry: LogEntry) {
        // receiver gone means nobody is watching any more
        let _ = self.send(entry);
    }
}

/// Keeps every entry in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn with_severity(&self, severity: Severity) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.severity == severity)
            .collect()
    }
}

impl LogSink for CollectingSink {
    fn emit(&self, entry: LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }
}

/// Mirrors `entry` to the `log` facade, then hands it to the sink.
pub(crate) fn publish(sink: &dyn LogSink, entry: LogEntry) {
    let file = match (&entry.file_name, entry.display_size()) {
        (Some(name), Some(size)) => format!(" [{} ({})]", name, size),
        (Some(name), None) => format!(" [{}]", name),
        _ => String::new(),
    };

    match entry.severity {
        Severity::Info | Severity::Success => log::info!("{}: {}{}", entry.category, entry.message, file),
        Severity::Warning => log::warn!("{}: {}{}", entry.category, entry.message, file),
        Severity::Error => log::error!("{}: {}{}", entry.category, entry.message, file),
    }

    sink.emit(entry);
}
