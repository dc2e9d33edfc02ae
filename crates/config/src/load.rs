//! Settings loading helpers (file + env).
//!
//! The loader is responsible for deterministic merge order and surfacing
//! user-facing errors as typed `ErrorEnvelope`s.

use crate::{LogEnv, Settings, apply_env_overrides};
use clog_shared::{ErrorCode, ErrorEnvelope};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsFormat {
    Json,
    Toml,
}

/// Load settings from optional JSON text and env overrides.
///
/// Precedence (highest wins):
/// - settings JSON
/// - env overrides (`LogEnv`)
/// - defaults, applied later by [`Settings::ensure_defaults`]
pub fn load_settings_from_sources(
    settings_json: Option<&str>,
    env: &LogEnv,
) -> Result<Settings, ErrorEnvelope> {
    let settings = match settings_json {
        None => Settings::default(),
        Some(input) => parse_settings(input, SettingsFormat::Json)?,
    };
    Ok(apply_env_overrides(settings, env))
}

/// Load settings from an optional file path and env overrides.
pub fn load_settings_from_path(
    settings_path: Option<&Path>,
    env: &LogEnv,
) -> Result<Settings, ErrorEnvelope> {
    let settings = match settings_path {
        None => Settings::default(),
        Some(path) => {
            let text = read_settings_file(path)?;
            let format = detect_settings_format(path)?;
            parse_settings(&text, format)?
        },
    };
    Ok(apply_env_overrides(settings, env))
}

/// Load settings from std env and an optional file path.
pub fn load_settings_std_env(settings_path: Option<&Path>) -> Result<Settings, ErrorEnvelope> {
    let env = LogEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_settings_from_path(settings_path, &env)
}

/// Serialize settings as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(settings: &Settings) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(settings).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize settings: {error}"),
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize settings as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(settings: &Settings) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(settings).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize settings TOML: {error}"),
        )
    })?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn parse_settings(input: &str, format: SettingsFormat) -> Result<Settings, ErrorEnvelope> {
    match format {
        SettingsFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid settings JSON: {error}"),
            )
            .with_metadata("source", "settings")
        }),
        SettingsFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid settings TOML: {error}"),
            )
            .with_metadata("source", "settings")
        }),
    }
}

fn read_settings_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "settings_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "settings_file_permission_denied")
            },
            _ => ErrorCode::new("config", "settings_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read settings file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}

fn detect_settings_format(path: &Path) -> Result<SettingsFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(SettingsFormat::Json),
        Some("toml") => Ok(SettingsFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported settings format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}
