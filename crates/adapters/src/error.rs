//! Adapter error types.

use clog_shared::{ErrorCode, ErrorEnvelope};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while constructing a logger.
#[derive(Debug, Error)]
pub enum LoggerBuildError {
    /// The output file could not be opened for appending.
    #[error("failed to open log file {}: {source}", path.display())]
    OpenFile {
        /// Requested path.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
}

impl From<LoggerBuildError> for ErrorEnvelope {
    fn from(error: LoggerBuildError) -> Self {
        let message = error.to_string();
        match error {
            LoggerBuildError::OpenFile { path, .. } => {
                Self::expected(ErrorCode::new("logger", "open_file"), message)
                    .with_metadata("path", path.to_string_lossy().into_owned())
            },
        }
    }
}
