//! Request-scoped logging context.
//!
//! A [`LogContext`] carries an optional logger handle plus the clues every
//! record built from it inherits. Deriving a context (attaching a handle,
//! adding a clue) returns a new value; the parent never changes.

use clog_config::Settings;
use clog_infra::{Logger, existing_singleton, settings_with_std_env, singleton};
use clog_ports::{LogFields, LoggerPort};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Request-scoped carrier for a logger handle and contextual metadata.
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    logger: Option<Logger>,
    clues: Arc<LogFields>,
    sensitive: Arc<BTreeSet<Box<str>>>,
}

impl LogContext {
    /// An empty context: no handle, no clues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `logger`. `None` leaves the context unchanged.
    #[must_use]
    pub fn attach(self, logger: Option<Logger>) -> Self {
        match logger {
            Some(logger) => Self {
                logger: Some(logger),
                ..self
            },
            None => self,
        }
    }

    /// Embed a caller-provided port, paired with default settings.
    #[must_use]
    pub fn seed(self, port: Arc<dyn LoggerPort>) -> Self {
        self.seed_with(port, Settings::default())
    }

    /// Embed a caller-provided port built from `settings`.
    #[must_use]
    pub fn seed_with(self, port: Arc<dyn LoggerPort>, settings: Settings) -> Self {
        self.attach(Some(Logger::new(port, settings)))
    }

    /// The attached handle, if any.
    #[must_use]
    pub const fn logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }

    /// The attached handle, or the process-wide logger when none is
    /// attached. A missing process-wide logger is built from default
    /// settings plus env overrides.
    #[must_use]
    pub fn resolve(&self) -> Logger {
        self.logger
            .clone()
            .or_else(existing_singleton)
            .unwrap_or_else(|| singleton(&settings_with_std_env(Settings::default())))
    }

    /// Add one clue.
    #[must_use]
    pub fn with_clue(mut self, key: impl Into<Box<str>>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.clues).insert(key.into(), value.into());
        self
    }

    /// Add several clues; later keys overwrite earlier ones.
    #[must_use]
    pub fn with_clues<I, K, V>(mut self, clues: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Box<str>>,
        V: Into<Value>,
    {
        let map = Arc::make_mut(&mut self.clues);
        for (key, value) in clues {
            map.insert(key.into(), value.into());
        }
        self
    }

    /// Add a clue whose value is concealed at emission.
    #[must_use]
    pub fn with_sensitive_clue(self, key: impl Into<Box<str>>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let mut next = self.with_clue(key.clone(), value);
        Arc::make_mut(&mut next.sensitive).insert(key);
        next
    }

    /// Contextual clues.
    #[must_use]
    pub fn clues(&self) -> &LogFields {
        &self.clues
    }

    /// Keys of clues flagged as sensitive.
    #[must_use]
    pub fn sensitive_keys(&self) -> &BTreeSet<Box<str>> {
        &self.sensitive
    }
}

/// Resolve (or create) the process-wide logger from `settings`, attach it
/// to `ctx` and return both.
///
/// Env overrides fill whatever `settings` leaves unset. Once the
/// process-wide logger exists, later settings are ignored.
pub fn init(ctx: LogContext, settings: &Settings) -> (LogContext, Logger) {
    let logger =
        existing_singleton().unwrap_or_else(|| singleton(&settings_with_std_env(settings.clone())));
    (ctx.attach(Some(logger.clone())), logger)
}

/// Keep the handle already attached to `ctx`, otherwise [`init`].
pub fn ctx_or_seed(ctx: LogContext, settings: &Settings) -> (LogContext, Logger) {
    match ctx.logger().cloned() {
        Some(logger) => (ctx, logger),
        None => init(ctx, settings),
    }
}

/// Blocking, best-effort drain of the logger resolved from `ctx`.
///
/// Records emitted concurrently with the flush may still be buffered.
pub fn flush(ctx: &LogContext) {
    ctx.resolve().flush();
}
