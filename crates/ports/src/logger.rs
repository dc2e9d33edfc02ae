//! Structured logging boundary contract.

use std::collections::BTreeMap;
use std::fmt;

/// Log level of an emitted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Debug.
    Debug,
    /// Info.
    Info,
    /// Error.
    Error,
}

impl LogLevel {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Minimum severity a logger lets through.
///
/// `Off` sits above every level, so nothing passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelFilter {
    /// Everything.
    Debug,
    /// Info and error.
    Info,
    /// Error only.
    Error,
    /// Nothing.
    Off,
}

impl LevelFilter {
    /// Returns true when `level` passes this filter.
    #[must_use]
    pub const fn allows(self, level: LogLevel) -> bool {
        self.rank() <= level_rank(level)
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Debug => 10,
            Self::Info => 20,
            Self::Error => 40,
            Self::Off => u8::MAX,
        }
    }
}

const fn level_rank(level: LogLevel) -> u8 {
    match level {
        LogLevel::Debug => 10,
        LogLevel::Info => 20,
        LogLevel::Error => 40,
    }
}

/// Structured fields attached to a record.
pub type LogFields = BTreeMap<Box<str>, serde_json::Value>;

/// Structured log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: Box<str>,
    /// Fully merged fields, written at the top level of the record.
    pub fields: LogFields,
}

impl LogEvent {
    /// Build an event from its parts.
    pub fn new(level: LogLevel, message: impl Into<Box<str>>, fields: LogFields) -> Self {
        Self {
            level,
            message: message.into(),
            fields,
        }
    }
}

/// Boundary contract for the underlying structured logger.
///
/// Implementations own severity filtering, formatting and write
/// serialization; callers only hand over finished events.
pub trait LoggerPort: Send + Sync {
    /// Emit a structured event.
    fn log(&self, event: LogEvent);

    /// Blocking, best-effort drain of buffered output.
    fn flush(&self) {}

    /// Convenience: debug event.
    fn debug(&self, message: &str, fields: LogFields) {
        self.log(LogEvent::new(LogLevel::Debug, message, fields));
    }

    /// Convenience: info event.
    fn info(&self, message: &str, fields: LogFields) {
        self.log(LogEvent::new(LogLevel::Info, message, fields));
    }

    /// Convenience: error event.
    fn error(&self, message: &str, fields: LogFields) {
        self.log(LogEvent::new(LogLevel::Error, message, fields));
    }
}
