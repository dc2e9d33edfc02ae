//! In-memory logger implementations for port contracts.
//!
//! These implementations are intended for:
//! - unit tests of call sites that emit records
//! - contract tests of the `LoggerPort` boundary

use clog_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A no-op logger implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl LoggerPort for NoopLogger {
    fn log(&self, _event: LogEvent) {}
}

#[derive(Debug, Default)]
struct Recorded {
    events: Mutex<Vec<LogEvent>>,
    flushes: AtomicUsize,
}

/// Logger recording every event in memory.
///
/// Clones share storage, so a clone handed to a context can be inspected
/// through the original.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogger {
    recorded: Arc<Recorded>,
}

impl MemoryLogger {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<LogEvent> {
        self.recorded.events.lock().unwrap().clone()
    }

    /// Drain recorded events.
    pub fn take(&self) -> Vec<LogEvent> {
        std::mem::take(&mut *self.recorded.events.lock().unwrap())
    }

    /// The single recorded event. Panics unless exactly one was recorded.
    pub fn only(&self) -> LogEvent {
        let events = self.events();
        assert_eq!(events.len(), 1, "expected exactly one event: {events:?}");
        events.into_iter().next().unwrap()
    }

    /// Messages of recorded events at `level`.
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level)
            .map(|event| event.message.into_string())
            .collect()
    }

    /// Number of flush calls observed.
    pub fn flushes(&self) -> usize {
        self.recorded.flushes.load(Ordering::SeqCst)
    }
}

impl LoggerPort for MemoryLogger {
    fn log(&self, event: LogEvent) {
        self.recorded.events.lock().unwrap().push(event);
    }

    fn flush(&self) {
        self.recorded.flushes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Build a one-field map.
pub fn fields_1(key: &str, value: impl Into<serde_json::Value>) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert(key.into(), value.into());
    fields
}
