//! # clog-adapters
//!
//! Logger implementations behind `LoggerPort`: JSON lines, human console
//! lines and a `tracing` bridge, plus the sinks they write to.
//! This crate depends on `ports`, `shared` and `config`.

/// Human-oriented console logger.
pub mod console;
/// Adapter error types.
pub mod error;
/// Output sinks.
pub mod log_sink;
/// JSON lines logger.
pub mod logger;
/// `tracing` bridge logger.
pub mod tracing_bridge;

#[cfg(test)]
pub(crate) mod test_support;

pub use console::ConsoleLogger;
pub use error::LoggerBuildError;
pub use log_sink::{FileLogSink, LogSink, StderrLogSink, StdoutLogSink, sink_for_target};
pub use logger::JsonLogger;
pub use tracing_bridge::TracingLogger;

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
