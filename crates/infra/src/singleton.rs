//! Process-wide logger instance.

use crate::logger_factory::{Logger, build_logger};
use clog_config::Settings;
use clog_ports::LogFields;
use serde_json::Value;
use std::sync::{Mutex, PoisonError};

/// Message of the debug record written when a logger is first created.
pub const SEEDING_MESSAGE: &str = "seeding logger";

/// A lazily created logger. The first caller's settings win.
#[derive(Debug, Default)]
pub struct LoggerCell {
    slot: Mutex<Option<Logger>>,
}

impl LoggerCell {
    /// Create an empty cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the existing logger, or build one from `settings`.
    ///
    /// The lock is held only across check-and-construct.
    pub fn get_or_init(&self, settings: &Settings) -> Logger {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = slot.as_ref() {
            return existing.clone();
        }

        let logger = build_logger(settings);
        *slot = Some(logger.clone());
        drop(slot);

        logger.port().debug(SEEDING_MESSAGE, seeding_fields(logger.settings()));
        logger
    }

    /// The logger, if one was created.
    pub fn get(&self) -> Option<Logger> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

static PROCESS_LOGGER: LoggerCell = LoggerCell::new();

/// Return the process-wide logger, creating it from `settings` on first use.
pub fn singleton(settings: &Settings) -> Logger {
    PROCESS_LOGGER.get_or_init(settings)
}

/// The process-wide logger, if one was created.
pub fn existing_singleton() -> Option<Logger> {
    PROCESS_LOGGER.get()
}

fn seeding_fields(settings: &Settings) -> LogFields {
    let value = serde_json::to_value(settings).unwrap_or(Value::Null);
    let mut fields = LogFields::new();
    fields.insert("logger_settings".into(), value);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use clog_config::{LogFormat, LogLevelSetting};
    use std::error::Error;

    #[test]
    fn first_settings_win() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("first.log");
        let cell = LoggerCell::new();
        assert!(cell.get().is_none());

        let first = cell.get_or_init(
            &Settings::default()
                .with_file(path.to_string_lossy().into_owned())
                .with_format(LogFormat::Json)
                .with_level(LogLevelSetting::Debug),
        );
        let second = cell.get_or_init(&Settings::default().with_level(LogLevelSetting::Error));

        assert!(first.ptr_eq(&second));
        assert_eq!(second.settings().level, Some(LogLevelSetting::Debug));

        first.flush();
        let contents = std::fs::read_to_string(&path)?;
        let record: Value = serde_json::from_str(contents.trim())?;
        assert_eq!(record.get("msg"), Some(&Value::from(SEEDING_MESSAGE)));
        assert_eq!(
            record
                .get("logger_settings")
                .and_then(|settings| settings.get("format")),
            Some(&Value::from("json"))
        );
        Ok(())
    }

    #[test]
    fn concurrent_callers_share_one_logger() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("race.log").to_string_lossy().into_owned();
        let cell = LoggerCell::new();

        let loggers: Vec<Logger> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let settings = Settings::default().with_file(file.clone());
                    let cell = &cell;
                    scope.spawn(move || cell.get_or_init(&settings))
                })
                .collect();
            handles
                .into_iter()
                .filter_map(|handle| handle.join().ok())
                .collect()
        });

        assert_eq!(loggers.len(), 8);
        let first = loggers.first().ok_or("no loggers")?;
        assert!(loggers.iter().all(|logger| logger.ptr_eq(first)));
        Ok(())
    }
}
