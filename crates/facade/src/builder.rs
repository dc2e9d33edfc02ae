//! Per-call metadata builder.
//!
//! A [`Builder`] gathers an error, key/value pairs, labels and comments,
//! then emits a single record when one of [`Builder::debug`],
//! [`Builder::info`] or [`Builder::error`] is called.

use crate::context::LogContext;
use clog_infra::Logger;
use clog_ports::{LogEvent, LogFields, LogLevel, LoggableError};
use clog_shared::is_secret_key;
use serde_json::Value;
use std::collections::BTreeSet;

/// Field holding the attached error's display text.
pub const ERROR_KEY: &str = "error";
/// Field holding the attached error's labels.
pub const ERROR_LABELS_KEY: &str = "error_labels";
/// Field holding the builder's labels.
pub const LABELS_KEY: &str = "clog_labels";
/// Field holding the builder's comments.
pub const COMMENTS_KEY: &str = "clog_comments";

/// Accumulates metadata for one log record.
///
/// Mutators consume and return the builder. Terminal methods borrow it, so
/// calling a second one re-emits the same merged record.
#[derive(Debug)]
pub struct Builder<'a> {
    ctx: &'a LogContext,
    logger: Logger,
    err: Option<Box<dyn LoggableError>>,
    with: LogFields,
    sensitive: BTreeSet<Box<str>>,
    labels: BTreeSet<String>,
    comments: BTreeSet<String>,
}

/// Start a builder over the logger resolved from `ctx`.
pub fn ctx(ctx: &LogContext) -> Builder<'_> {
    Builder::new(ctx)
}

/// Start a builder with `err` already attached.
pub fn ctx_err<E>(ctx: &LogContext, err: E) -> Builder<'_>
where
    E: LoggableError + 'static,
{
    Builder::new(ctx).err(err)
}

impl<'a> Builder<'a> {
    /// Create a builder; the logger is resolved immediately.
    pub fn new(ctx: &'a LogContext) -> Self {
        Self {
            ctx,
            logger: ctx.resolve(),
            err: None,
            with: LogFields::new(),
            sensitive: BTreeSet::new(),
            labels: BTreeSet::new(),
            comments: BTreeSet::new(),
        }
    }

    /// Attach `err`, replacing any previously attached error.
    ///
    /// Its display text lands under `error`, its labels under
    /// `error_labels`, and its clues override the context's.
    #[must_use]
    pub fn err<E>(mut self, err: E) -> Self
    where
        E: LoggableError + 'static,
    {
        self.err = Some(Box::new(err));
        self
    }

    /// Add labels. Duplicates collapse.
    #[must_use]
    pub fn label<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Add a free-text comment. Duplicates collapse.
    #[must_use]
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comments.insert(text.into());
        self
    }

    /// Add one key/value pair; the last write to a key wins.
    #[must_use]
    pub fn with(mut self, key: impl Into<Box<str>>, value: impl Into<Value>) -> Self {
        self.with.insert(key.into(), value.into());
        self
    }

    /// Add pairs from a flat `key, value, key, value, ...` sequence.
    ///
    /// An odd-length sequence gives its last key a `null` value. Keys that
    /// are not strings are stringified as JSON.
    #[must_use]
    pub fn with_pairs<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut values = values.into_iter().map(Into::into);
        while let Some(key) = values.next() {
            let value = values.next().unwrap_or(Value::Null);
            self.with.insert(key_text(key), value);
        }
        self
    }

    /// Add a pair whose value is concealed per the logger's settings.
    #[must_use]
    pub fn with_sensitive(mut self, key: impl Into<Box<str>>, value: impl Into<Value>) -> Self {
        let key = key.into();
        self.sensitive.insert(key.clone());
        self.with(key, value)
    }

    /// The logger this builder emits through.
    #[must_use]
    pub const fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Labels, sorted.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.labels.iter().cloned().collect()
    }

    /// Comments, sorted.
    #[must_use]
    pub fn comments(&self) -> Vec<String> {
        self.comments.iter().cloned().collect()
    }

    /// Fields the next terminal call would emit.
    ///
    /// Context clues first, then the error's clues, then pairs added to the
    /// builder; each layer overwrites the previous one.
    #[must_use]
    pub fn merged_fields(&self) -> LogFields {
        let mut fields = self.ctx.clues().clone();

        if let Some(err) = &self.err {
            fields.extend(err.clues());
            fields.insert(ERROR_KEY.into(), Value::String(err.to_string()));
            fields.insert(ERROR_LABELS_KEY.into(), string_array(err.labels()));
        }

        fields.extend(self.with.iter().map(|(key, value)| (key.clone(), value.clone())));
        fields.insert(LABELS_KEY.into(), string_array(self.labels()));
        fields.insert(COMMENTS_KEY.into(), string_array(self.comments()));

        let handling = self.logger.settings().sensitive_info_handling();
        for (key, value) in &mut fields {
            if self.is_sensitive(key) {
                *value = handling.conceal_value(std::mem::take(value));
            }
        }
        fields
    }

    /// Emit at debug level.
    ///
    /// Dropped when the debug label filter is set and none of this
    /// builder's labels match it.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Emit at info level.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Emit at error level. No error needs to be attached.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        if level == LogLevel::Debug && !self.logger.settings().allows_debug_with(&self.labels()) {
            return;
        }
        let event = LogEvent::new(level, message, self.merged_fields());
        self.logger.port().log(event);
    }

    fn is_sensitive(&self, key: &str) -> bool {
        self.sensitive.contains(key) || self.ctx.sensitive_keys().contains(key) || is_secret_key(key)
    }
}

fn key_text(key: Value) -> Box<str> {
    match key {
        Value::String(text) => text.into_boxed_str(),
        other => other.to_string().into_boxed_str(),
    }
}

fn string_array(values: Vec<String>) -> Value {
    Value::Array(values.into_iter().map(Value::String).collect())
}
