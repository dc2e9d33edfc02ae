//! Structured JSON logger adapter.

use crate::log_sink::LogSink;
use chrono::{SecondsFormat, Utc};
use clog_ports::{LevelFilter, LogEvent, LoggerPort};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Timestamp key.
pub const TIME_KEY: &str = "ts";
/// Level key.
pub const LEVEL_KEY: &str = "level";
/// Message key.
pub const MESSAGE_KEY: &str = "msg";

/// JSON logger emitting one object per line.
///
/// Fields sit at the top level next to `ts`, `level` and `msg`; those three
/// keys win over a field of the same name.
#[derive(Clone)]
pub struct JsonLogger {
    sink: Arc<dyn LogSink>,
    min_level: LevelFilter,
}

impl JsonLogger {
    /// Create a JSON logger backed by the provided sink.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            min_level: LevelFilter::Info,
        }
    }

    /// Set the minimum log level.
    #[must_use]
    pub const fn with_min_level(mut self, level: LevelFilter) -> Self {
        self.min_level = level;
        self
    }

    fn encode(&self, event: LogEvent) -> String {
        let mut payload = Map::new();
        for (key, value) in event.fields {
            payload.insert(key.into_string(), value);
        }
        payload.insert(TIME_KEY.to_string(), Value::String(timestamp()));
        payload.insert(
            LEVEL_KEY.to_string(),
            Value::String(event.level.as_str().to_string()),
        );
        payload.insert(
            MESSAGE_KEY.to_string(),
            Value::String(event.message.into_string()),
        );

        serde_json::to_string(&Value::Object(payload)).map_or_else(
            |_| {
                "{\"level\":\"error\",\"msg\":\"log serialization failed\",\"ts\":\"\"}\n"
                    .to_string()
            },
            |mut encoded| {
                encoded.push('\n');
                encoded
            },
        )
    }
}

impl LoggerPort for JsonLogger {
    fn log(&self, event: LogEvent) {
        if !self.min_level.allows(event.level) {
            return;
        }
        let line = self.encode(event);
        self.sink.write_line(&line);
    }

    fn flush(&self) {
        self.sink.flush();
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
