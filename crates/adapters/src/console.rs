//! Human-oriented console logger adapter.
//!
//! Lines are tab-separated columns: local time, level, message and (when
//! present) the fields as one compact JSON object.

use crate::log_sink::LogSink;
use chrono::{DateTime, Local, Timelike};
use clog_ports::{LevelFilter, LogEvent, LogLevel, LoggerPort};
use colored::Colorize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Console logger emitting one human-readable line per event.
#[derive(Clone)]
pub struct ConsoleLogger {
    sink: Arc<dyn LogSink>,
    min_level: LevelFilter,
    color: bool,
}

impl ConsoleLogger {
    /// Create a console logger backed by the provided sink. Colors are off.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            min_level: LevelFilter::Info,
            color: false,
        }
    }

    /// Set the minimum log level.
    #[must_use]
    pub const fn with_min_level(mut self, level: LevelFilter) -> Self {
        self.min_level = level;
        self
    }

    /// Toggle colored level names.
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn format_line(&self, event: &LogEvent, now: DateTime<Local>) -> String {
        let mut line = format!(
            "{}\t{}\t{}",
            clock(now),
            self.level_label(event.level),
            event.message
        );

        if !event.fields.is_empty() {
            let fields: Map<String, Value> = event
                .fields
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect();
            let encoded = serde_json::to_string(&Value::Object(fields))
                .unwrap_or_else(|_| "{}".to_string());
            line.push('\t');
            line.push_str(&encoded);
        }
        line.push('\n');
        line
    }

    fn level_label(&self, level: LogLevel) -> String {
        let label = level.as_str().to_ascii_uppercase();
        if !self.color {
            return label;
        }
        match level {
            LogLevel::Debug => label.as_str().magenta().to_string(),
            LogLevel::Info => label.as_str().blue().to_string(),
            LogLevel::Error => label.as_str().red().to_string(),
        }
    }
}

impl LoggerPort for ConsoleLogger {
    fn log(&self, event: LogEvent) {
        if !self.min_level.allows(event.level) {
            return;
        }
        let line = self.format_line(&event, Local::now());
        self.sink.write_line(&line);
    }

    fn flush(&self) {
        self.sink.flush();
    }
}

/// `HH:MM:SS.cc`, hundredths of a second.
fn clock(now: DateTime<Local>) -> String {
    let centis = now.nanosecond() % 1_000_000_000 / 10_000_000;
    format!("{}.{centis:02}", now.format("%H:%M:%S"))
}
