use clog_shared::{ErrorEnvelope, is_secret_key, redact_metadata};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Ok = 0,
    InvalidInput = 2,
    Io = 3,
    Internal = 1,
}

impl ExitCode {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Debug)]
pub enum CliError {
    InvalidInput(String),
    Io(std::io::Error),
    Settings(ErrorEnvelope),
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidInput(_) => ExitCode::InvalidInput,
            Self::Io(_) => ExitCode::Io,
            Self::Settings(envelope) => settings_exit_code(envelope),
        }
    }
}

fn settings_exit_code(envelope: &ErrorEnvelope) -> ExitCode {
    if envelope.code.namespace() != "config" {
        return ExitCode::Internal;
    }
    if envelope.code.code().starts_with("settings_file_") {
        ExitCode::Io
    } else {
        ExitCode::InvalidInput
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(formatter, "invalid input: {message}"),
            Self::Io(error) => write!(formatter, "io error: {error}"),
            Self::Settings(envelope) => {
                write!(formatter, "settings error: {envelope}")?;
                let secret_keys: Vec<&str> = envelope
                    .metadata
                    .keys()
                    .map(String::as_str)
                    .filter(|key| is_secret_key(key))
                    .collect();
                for (key, value) in redact_metadata(envelope.metadata.clone(), &secret_keys) {
                    write!(formatter, " {key}={value}")?;
                }
                Ok(())
            },
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<ErrorEnvelope> for CliError {
    fn from(envelope: ErrorEnvelope) -> Self {
        Self::Settings(envelope)
    }
}
