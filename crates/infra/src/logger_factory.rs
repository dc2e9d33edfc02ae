//! Logger construction from settings.

use crate::InfraResult;
use clog_adapters::{ConsoleLogger, JsonLogger, StderrLogSink, sink_for_target};
use clog_config::{LogFormat, LogLevelSetting, LogTarget, Settings};
use clog_ports::{LevelFilter, LoggerPort};
use clog_shared::ErrorEnvelope;
use std::fmt;
use std::sync::Arc;

/// Cheap-to-clone logger handle: a port plus the settings it was built from.
#[derive(Clone)]
pub struct Logger {
    port: Arc<dyn LoggerPort>,
    settings: Arc<Settings>,
}

impl Logger {
    /// Pair an existing port with settings.
    pub fn new(port: Arc<dyn LoggerPort>, settings: Settings) -> Self {
        Self {
            port,
            settings: Arc::new(settings),
        }
    }

    /// The underlying port.
    #[must_use]
    pub fn port(&self) -> &Arc<dyn LoggerPort> {
        &self.port
    }

    /// The settings this handle was built from.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Blocking, best-effort drain of buffered output.
    pub fn flush(&self) {
        self.port.flush();
    }

    /// Returns true when both handles share the same port.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.port, &other.port)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Logger")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Map a level setting onto the port-level filter.
#[must_use]
pub const fn level_filter(level: LogLevelSetting) -> LevelFilter {
    match level {
        LogLevelSetting::Debug => LevelFilter::Debug,
        LogLevelSetting::Info => LevelFilter::Info,
        LogLevelSetting::Error => LevelFilter::Error,
        LogLevelSetting::Disabled => LevelFilter::Off,
    }
}

/// Build a logger, surfacing construction failures.
///
/// `settings` are normalized with [`Settings::ensure_defaults`] first.
pub fn try_build_logger(settings: &Settings) -> InfraResult<Logger> {
    let settings = settings.clone().ensure_defaults();
    let port = build_port(&settings)?;
    Ok(Logger::new(port, settings))
}

/// Build a logger; never fails.
///
/// When the configured output cannot be opened the failure is reported on
/// stderr and a console logger on stderr takes over.
pub fn build_logger(settings: &Settings) -> Logger {
    let settings = settings.clone().ensure_defaults();
    match build_port(&settings) {
        Ok(port) => Logger::new(port, settings),
        Err(error) => {
            eprintln!("clog: falling back to stderr logging: {error}");
            fallback_logger(settings)
        },
    }
}

/// Console logger on stderr.
///
/// Keeps the configured level; with no level set it logs down to debug.
pub fn fallback_logger(settings: Settings) -> Logger {
    let min_level = fallback_filter(settings.level);
    let port = ConsoleLogger::new(Arc::new(StderrLogSink)).with_min_level(min_level);
    Logger::new(Arc::new(port), settings)
}

const fn fallback_filter(level: Option<LogLevelSetting>) -> LevelFilter {
    match level {
        Some(level) => level_filter(level),
        None => LevelFilter::Debug,
    }
}

fn build_port(settings: &Settings) -> InfraResult<Arc<dyn LoggerPort>> {
    let target = settings.target();
    let sink = sink_for_target(&target).map_err(ErrorEnvelope::from)?;
    let min_level = level_filter(settings.level());

    let port: Arc<dyn LoggerPort> = match settings.format() {
        LogFormat::Json => Arc::new(JsonLogger::new(sink).with_min_level(min_level)),
        LogFormat::Human => Arc::new(
            ConsoleLogger::new(sink)
                .with_min_level(min_level)
                .with_color(matches!(target, LogTarget::Stdout | LogTarget::Stderr)),
        ),
    };
    Ok(port)
}
