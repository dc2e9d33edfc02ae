//! Logging settings and their defaulting rules.
//!
//! Every field is optional on input. [`Settings::ensure_defaults`] fills
//! anything unset; text inputs (settings files, env, CLI flags) are parsed
//! leniently so an unknown value behaves exactly like an unset one.

use crate::log_file::{LogFileResolver, STDERR, STDOUT, get_log_file_or_default};
use clog_shared::SensitiveInfoHandling;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Columnar, human-oriented lines.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "human" | "text" | "console" => Ok(Self::Human),
            "json" | "structured" => Ok(Self::Json),
            _ => Err(UnknownValue::new("format", value)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Minimum level to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevelSetting {
    /// Debug and above.
    Debug,
    /// Info and above.
    #[default]
    Info,
    /// Errors only.
    Error,
    /// Nothing is emitted.
    Disabled,
}

impl LogLevelSetting {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Error => "error",
            Self::Disabled => "disabled",
        }
    }
}

impl FromStr for LogLevelSetting {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "error" => Ok(Self::Error),
            "disabled" | "off" => Ok(Self::Disabled),
            _ => Err(UnknownValue::new("level", value)),
        }
    }
}

impl fmt::Display for LogLevelSetting {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// An enumerated setting received a value outside its valid set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue {
    /// Setting name.
    pub field: &'static str,
    /// Raw input.
    pub value: String,
}

impl UnknownValue {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for UnknownValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "unsupported {} value: {}", self.field, self.value)
    }
}

impl std::error::Error for UnknownValue {}

/// Where records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
    /// An appendable file.
    File(PathBuf),
}

impl LogTarget {
    /// Interpret a resolved `file` setting.
    #[must_use]
    pub fn from_setting(value: &str) -> Self {
        if value == "-" || value.eq_ignore_ascii_case(STDOUT) {
            Self::Stdout
        } else if value.eq_ignore_ascii_case(STDERR) {
            Self::Stderr
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    /// Returns true for the standard streams.
    #[must_use]
    pub const fn is_std_stream(&self) -> bool {
        matches!(self, Self::Stdout | Self::Stderr)
    }
}

/// The user's preferred logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Output path, or the `stdout` / `stderr` sentinels, or `-`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Output encoding.
    #[serde(
        deserialize_with = "lenient_enum",
        skip_serializing_if = "Option::is_none"
    )]
    pub format: Option<LogFormat>,
    /// Minimum level to emit.
    #[serde(
        deserialize_with = "lenient_enum",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<LogLevelSetting>,
    /// How values flagged as sensitive are rendered.
    #[serde(
        deserialize_with = "lenient_enum",
        skip_serializing_if = "Option::is_none"
    )]
    pub sensitive_info_handling: Option<SensitiveInfoHandling>,
    /// Debug records are only emitted when they carry one of these labels.
    /// Empty means no filtering.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub only_log_debug_if_contains_label: Vec<String>,
}

impl Settings {
    /// Set the output file (or sentinel).
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the output format.
    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the minimum level.
    #[must_use]
    pub const fn with_level(mut self, level: LogLevelSetting) -> Self {
        self.level = Some(level);
        self
    }

    /// Set the sensitive-info handling strategy.
    #[must_use]
    pub const fn with_sensitive_info_handling(mut self, handling: SensitiveInfoHandling) -> Self {
        self.sensitive_info_handling = Some(handling);
        self
    }

    /// Set the debug label allow-list.
    #[must_use]
    pub fn with_debug_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only_log_debug_if_contains_label = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Fill every unset field with its default, resolving the output file
    /// through the process-wide resolver.
    #[must_use]
    pub fn ensure_defaults(self) -> Self {
        let file = get_log_file_or_default(self.file.as_deref());
        self.fill(file)
    }

    /// Same as [`Settings::ensure_defaults`] with an explicit resolver.
    #[must_use]
    pub fn ensure_defaults_with(self, resolver: &LogFileResolver) -> Self {
        let file = resolver.resolve(self.file.as_deref());
        self.fill(file)
    }

    fn fill(self, file: String) -> Self {
        Self {
            file: Some(file),
            format: Some(self.format.unwrap_or_default()),
            level: Some(self.level.unwrap_or_default()),
            sensitive_info_handling: Some(self.sensitive_info_handling.unwrap_or_default()),
            only_log_debug_if_contains_label: normalize_labels(
                self.only_log_debug_if_contains_label,
            ),
        }
    }

    /// Effective format.
    #[must_use]
    pub fn format(&self) -> LogFormat {
        self.format.unwrap_or_default()
    }

    /// Effective level.
    #[must_use]
    pub fn level(&self) -> LogLevelSetting {
        self.level.unwrap_or_default()
    }

    /// Effective sensitive-info handling.
    #[must_use]
    pub fn sensitive_info_handling(&self) -> SensitiveInfoHandling {
        self.sensitive_info_handling.unwrap_or_default()
    }

    /// Effective output target. An unresolved file reads as standard error.
    #[must_use]
    pub fn target(&self) -> LogTarget {
        self.file
            .as_deref()
            .map_or(LogTarget::Stderr, LogTarget::from_setting)
    }

    /// Returns true when a debug record with `labels` passes the debug
    /// label filter.
    #[must_use]
    pub fn allows_debug_with<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        let allow = &self.only_log_debug_if_contains_label;
        allow.is_empty()
            || labels
                .iter()
                .any(|label| allow.iter().any(|allowed| allowed == label.as_ref()))
    }
}

fn normalize_labels(labels: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let trimmed = label.trim();
        if trimmed.is_empty() || normalized.iter().any(|seen| seen == trimmed) {
            continue;
        }
        normalized.push(trimmed.to_string());
    }
    normalized
}

fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::error::Error;

    fn resolver() -> LogFileResolver {
        LogFileResolver::new(std::env::temp_dir().join("clog-settings-tests"), None)
    }

    #[test]
    fn empty_settings_get_documented_defaults() {
        let settings = Settings::default().ensure_defaults_with(&resolver());

        assert_eq!(settings.level, Some(LogLevelSetting::Info));
        assert_eq!(settings.format, Some(LogFormat::Human));
        assert_eq!(
            settings.sensitive_info_handling,
            Some(SensitiveInfoHandling::PlainText)
        );
        assert!(settings.file.is_some());
        assert!(settings.only_log_debug_if_contains_label.is_empty());
    }

    #[test]
    fn invalid_text_values_fall_back_to_defaults() -> Result<(), Box<dyn Error>> {
        let raw = r#"{"file":"stdout","format":"yaml","level":"verbose","sensitiveInfoHandling":"rot13"}"#;
        let settings: Settings = serde_json::from_str(raw)?;
        assert_eq!(settings.format, None);
        assert_eq!(settings.level, None);

        let settings = settings.ensure_defaults_with(&resolver());
        assert_eq!(settings.level(), LogLevelSetting::Info);
        assert_eq!(settings.format(), LogFormat::Human);
        assert_eq!(
            settings.sensitive_info_handling(),
            SensitiveInfoHandling::PlainText
        );
        assert_eq!(settings.target(), LogTarget::Stdout);
        Ok(())
    }

    #[test]
    fn explicit_values_survive_defaulting() {
        let settings = Settings::default()
            .with_file("-")
            .with_format(LogFormat::Json)
            .with_level(LogLevelSetting::Disabled)
            .with_sensitive_info_handling(SensitiveInfoHandling::Hash)
            .with_debug_labels([" api ", "api", "", "cleanup"])
            .ensure_defaults_with(&resolver());

        assert_eq!(settings.file.as_deref(), Some(STDOUT));
        assert_eq!(settings.format(), LogFormat::Json);
        assert_eq!(settings.level(), LogLevelSetting::Disabled);
        assert_eq!(settings.sensitive_info_handling(), SensitiveInfoHandling::Hash);
        assert_eq!(
            settings.only_log_debug_if_contains_label,
            vec!["api".to_string(), "cleanup".to_string()]
        );
    }

    #[test]
    fn debug_label_filter_requires_intersection() {
        let open = Settings::default();
        assert!(open.allows_debug_with::<&str>(&[]));

        let gated = Settings::default().with_debug_labels(["api"]);
        assert!(gated.allows_debug_with(&["api", "other"]));
        assert!(!gated.allows_debug_with(&["other"]));
        assert!(!gated.allows_debug_with::<&str>(&[]));
    }

    #[test]
    fn enum_names_parse_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().ok(), Some(LogFormat::Json));
        assert_eq!(
            "Off".parse::<LogLevelSetting>().ok(),
            Some(LogLevelSetting::Disabled)
        );
        assert!("loud".parse::<LogLevelSetting>().is_err());
    }

    fn arbitrary_settings() -> impl Strategy<Value = Settings> {
        (
            prop::option::of(prop_oneof![
                Just("stdout".to_string()),
                Just("stderr".to_string()),
                Just("-".to_string()),
            ]),
            prop::option::of(prop_oneof![Just(LogFormat::Human), Just(LogFormat::Json)]),
            prop::option::of(prop_oneof![
                Just(LogLevelSetting::Debug),
                Just(LogLevelSetting::Info),
                Just(LogLevelSetting::Error),
                Just(LogLevelSetting::Disabled),
            ]),
            prop::option::of(prop_oneof![
                Just(SensitiveInfoHandling::PlainText),
                Just(SensitiveInfoHandling::Mask),
                Just(SensitiveInfoHandling::Hash),
            ]),
            prop::collection::vec("[ a-z]{0,6}", 0..4),
        )
            .prop_map(|(file, format, level, handling, labels)| Settings {
                file,
                format,
                level,
                sensitive_info_handling: handling,
                only_log_debug_if_contains_label: labels,
            })
    }

    proptest! {
        #[test]
        fn ensure_defaults_is_idempotent(settings in arbitrary_settings()) {
            let resolver = resolver();
            let once = settings.ensure_defaults_with(&resolver);
            let twice = once.clone().ensure_defaults_with(&resolver);
            prop_assert_eq!(once, twice);
        }
    }
}
