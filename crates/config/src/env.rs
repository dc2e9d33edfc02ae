//! Environment variable parsing and env-to-settings merging.
//!
//! This module keeps env parsing:
//! - strict (invalid values fail fast)
//! - deterministic (CSV lists normalize to trimmed, deduped values)
//! - safe (secret values are redacted in error metadata)

use crate::log_file::ENV_LOG_FILE;
use crate::settings::{LogFormat, LogLevelSetting, Settings};
use clog_shared::{ErrorCode, ErrorEnvelope, REDACTED_VALUE, SensitiveInfoHandling, is_secret_key};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Env var: output format (`human` or `json`).
pub const ENV_LOG_FORMAT: &str = "CLOG_FORMAT";
/// Env var: minimum level (`debug`, `info`, `error`, `disabled`).
pub const ENV_LOG_LEVEL: &str = "CLOG_LEVEL";
/// Env var: sensitive value strategy (`plaintext`, `mask`, `hash`).
pub const ENV_SENSITIVE_INFO_HANDLING: &str = "CLOG_SENSITIVE_INFO_HANDLING";
/// Env var: comma-separated debug label allow-list.
pub const ENV_DEBUG_LABELS: &str = "CLOG_DEBUG_LABELS";

/// Maximum number of entries accepted in the debug label allow-list.
pub const MAX_DEBUG_LABELS: usize = 256;

const ALL_VARS: [&str; 5] = [
    ENV_LOG_FILE,
    ENV_LOG_FORMAT,
    ENV_LOG_LEVEL,
    ENV_SENSITIVE_INFO_HANDLING,
    ENV_DEBUG_LABELS,
];

/// Parsed environment overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEnv {
    /// Log output destination.
    pub file: Option<Box<str>>,
    /// Output format.
    pub format: Option<LogFormat>,
    /// Minimum level.
    pub level: Option<LogLevelSetting>,
    /// Sensitive value strategy.
    pub sensitive_info_handling: Option<SensitiveInfoHandling>,
    /// Debug label allow-list.
    pub debug_labels: Option<Vec<Box<str>>>,
}

impl LogEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            file: parse_optional_trimmed_string(map, ENV_LOG_FILE)?,
            format: parse_optional_enum(map, ENV_LOG_FORMAT)?,
            level: parse_optional_enum(map, ENV_LOG_LEVEL)?,
            sensitive_info_handling: parse_optional_enum(map, ENV_SENSITIVE_INFO_HANDLING)?,
            debug_labels: parse_optional_csv(map, ENV_DEBUG_LABELS)?,
        })
    }

    /// Parse env overrides from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let map = ALL_VARS
            .into_iter()
            .filter_map(|name| {
                std::env::var(name)
                    .ok()
                    .map(|value| (name.to_string(), value))
            })
            .collect();
        Self::from_map(&map)
    }

    /// Returns true when no variable was set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.file.is_none()
            && self.format.is_none()
            && self.level.is_none()
            && self.sensitive_info_handling.is_none()
            && self.debug_labels.is_none()
    }
}

/// Apply env overrides to settings.
///
/// Only fields the caller left unset are filled, so explicit settings keep
/// precedence. The file destination is not applied here; it flows through
/// the log file resolver so its caching rules hold.
#[must_use]
pub fn apply_env_overrides(mut settings: Settings, env: &LogEnv) -> Settings {
    if settings.format.is_none() {
        settings.format = env.format;
    }
    if settings.level.is_none() {
        settings.level = env.level;
    }
    if settings.sensitive_info_handling.is_none() {
        settings.sensitive_info_handling = env.sensitive_info_handling;
    }
    if settings.only_log_debug_if_contains_label.is_empty() {
        if let Some(labels) = env.debug_labels.as_ref() {
            settings.only_log_debug_if_contains_label =
                labels.iter().map(|label| label.to_string()).collect();
        }
    }
    settings
}

/// Validation failures when parsing env variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// CSV list exceeds a safety limit.
    CsvTooLarge {
        /// Env var name.
        var: &'static str,
        /// Number of parsed items.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
            Self::CsvTooLarge { .. } => ErrorCode::new("config", "invalid_env_csv"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
            Self::CsvTooLarge { var, len, max } => {
                write!(formatter, "{var} is too large ({len} items, max {max})")
            },
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidEnum { var, value } => envelope
                .with_metadata("env_var", var)
                .with_metadata("value", redact_value(var, &value)),
            EnvParseError::CsvTooLarge { var, len, max } => envelope
                .with_metadata("env_var", var)
                .with_metadata("len", len.to_string())
                .with_metadata("max", max.to_string()),
        }
    }
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    Ok(Some(trimmed.to_owned().into_boxed_str()))
}

fn parse_optional_enum<T: FromStr>(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<T>, EnvParseError> {
    let Some(raw) = parse_optional_trimmed_string(map, var)? else {
        return Ok(None);
    };

    raw.parse().map(Some).map_err(|_| EnvParseError::InvalidEnum {
        var,
        value: raw.into_string(),
    })
}

fn parse_optional_csv(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Vec<Box<str>>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let mut values: Vec<Box<str>> = Vec::new();
    for part in parse_csv(raw) {
        if !values.iter().any(|existing| **existing == *part) {
            values.push(part.into_boxed_str());
        }
    }

    if values.len() > MAX_DEBUG_LABELS {
        return Err(EnvParseError::CsvTooLarge {
            var,
            len: values.len(),
            max: MAX_DEBUG_LABELS,
        });
    }

    Ok(Some(values))
}

fn parse_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn redact_value(var: &str, value: &str) -> String {
    if is_secret_key(var) {
        REDACTED_VALUE.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn env_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn missing_vars_parse_to_empty() -> Result<(), Box<dyn Error>> {
        let env = LogEnv::from_map(&BTreeMap::new())?;
        assert!(env.is_empty());
        Ok(())
    }

    #[test]
    fn enums_are_case_insensitive() -> Result<(), Box<dyn Error>> {
        let env = LogEnv::from_map(&env_map(&[
            (ENV_LOG_FORMAT, " JSON "),
            (ENV_LOG_LEVEL, "Error"),
            (ENV_SENSITIVE_INFO_HANDLING, "hash"),
        ]))?;
        assert_eq!(env.format, Some(LogFormat::Json));
        assert_eq!(env.level, Some(LogLevelSetting::Error));
        assert_eq!(
            env.sensitive_info_handling,
            Some(SensitiveInfoHandling::Hash)
        );
        Ok(())
    }

    #[test]
    fn empty_value_is_rejected() {
        let result = LogEnv::from_map(&env_map(&[(ENV_LOG_LEVEL, "  ")]));
        assert_eq!(
            result,
            Err(EnvParseError::EmptyValue { var: ENV_LOG_LEVEL })
        );
    }

    #[test]
    fn unknown_enum_maps_to_envelope_metadata() -> Result<(), Box<dyn Error>> {
        let result = LogEnv::from_map(&env_map(&[(ENV_LOG_FORMAT, "xml")]));
        let Err(error) = result else {
            return Err("expected parse failure".into());
        };
        let envelope = ErrorEnvelope::from(error);
        assert_eq!(envelope.code, ErrorCode::new("config", "invalid_env_enum"));
        assert_eq!(
            envelope.metadata.get("env_var").map(String::as_str),
            Some(ENV_LOG_FORMAT)
        );
        assert_eq!(
            envelope.metadata.get("value").map(String::as_str),
            Some("xml")
        );
        Ok(())
    }

    #[test]
    fn csv_labels_are_trimmed_and_deduped() -> Result<(), Box<dyn Error>> {
        let env = LogEnv::from_map(&env_map(&[(ENV_DEBUG_LABELS, " b, a,,b ,c")]))?;
        let labels: Vec<&str> = env
            .debug_labels
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(AsRef::as_ref)
            .collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
        Ok(())
    }

    #[test]
    fn oversized_csv_is_rejected() {
        let raw = (0..=MAX_DEBUG_LABELS)
            .map(|index| format!("label{index}"))
            .collect::<Vec<_>>()
            .join(",");
        let result = LogEnv::from_map(&env_map(&[(ENV_DEBUG_LABELS, raw.as_str())]));
        assert!(matches!(result, Err(EnvParseError::CsvTooLarge { .. })));
    }

    #[test]
    fn overrides_fill_only_unset_fields() -> Result<(), Box<dyn Error>> {
        let env = LogEnv::from_map(&env_map(&[
            (ENV_LOG_FILE, "/tmp/ignored.log"),
            (ENV_LOG_FORMAT, "json"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_DEBUG_LABELS, "api"),
        ]))?;
        let settings = Settings::default().with_level(LogLevelSetting::Error);
        let merged = apply_env_overrides(settings, &env);

        assert_eq!(merged.format, Some(LogFormat::Json));
        assert_eq!(merged.level, Some(LogLevelSetting::Error));
        assert_eq!(merged.only_log_debug_if_contains_label, vec!["api"]);
        assert_eq!(merged.file, None);
        Ok(())
    }
}
