//! Logger adapter forwarding records into the `tracing` ecosystem.
//!
//! Useful when the host process already installed a subscriber: records
//! become `tracing` events under the `clog` target, with the merged fields
//! encoded as one JSON string in the `fields` field.

use clog_ports::{LevelFilter, LogEvent, LogFields, LogLevel, LoggerPort};
use serde_json::{Map, Value};

/// Target used for bridged events.
pub const TRACING_TARGET: &str = "clog";

/// Logger that emits `tracing` events instead of writing lines itself.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    min_level: LevelFilter,
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingLogger {
    /// Create a bridge passing info and above.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_level: LevelFilter::Info,
        }
    }

    /// Set the minimum log level.
    #[must_use]
    pub const fn with_min_level(mut self, level: LevelFilter) -> Self {
        self.min_level = level;
        self
    }
}

impl LoggerPort for TracingLogger {
    fn log(&self, event: LogEvent) {
        if !self.min_level.allows(event.level) {
            return;
        }
        let fields = encode_fields(&event.fields).unwrap_or_default();
        let message = &*event.message;
        match event.level {
            LogLevel::Debug => {
                tracing::debug!(target: TRACING_TARGET, fields = %fields, "{message}");
            },
            LogLevel::Info => {
                tracing::info!(target: TRACING_TARGET, fields = %fields, "{message}");
            },
            LogLevel::Error => {
                tracing::error!(target: TRACING_TARGET, fields = %fields, "{message}");
            },
        }
    }

}

fn encode_fields(fields: &LogFields) -> Option<String> {
    if fields.is_empty() {
        return None;
    }
    let map: Map<String, Value> = fields
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
    serde_json::to_string(&Value::Object(map)).ok()
}
