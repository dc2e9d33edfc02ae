//! Contract for errors that carry their own log metadata.

use crate::LogFields;
use clog_shared::ErrorEnvelope;
use serde_json::Value;

/// An error that can be attached to a log record.
///
/// The display text always lands under `error`. Implementors may also expose
/// key/value clues (merged over the context's clues) and a label set
/// (written under `error_labels`). Both default to empty, so plain error
/// types opt in with an empty `impl`.
pub trait LoggableError: std::error::Error + Send + Sync {
    /// Key/value metadata carried by the error.
    fn clues(&self) -> LogFields {
        LogFields::new()
    }

    /// Labels carried by the error, sorted and deduplicated.
    fn labels(&self) -> Vec<String> {
        Vec::new()
    }
}

impl LoggableError for ErrorEnvelope {
    fn clues(&self) -> LogFields {
        self.metadata
            .iter()
            .map(|(key, value)| {
                (
                    key.clone().into_boxed_str(),
                    Value::String(value.clone()),
                )
            })
            .collect()
    }

    fn labels(&self) -> Vec<String> {
        self.labels.iter().cloned().collect()
    }
}

impl LoggableError for std::io::Error {}
