//! Integration tests for env parsing and env-to-settings merging.

use clog_config::{
    EnvParseError, LogEnv, LogFileResolver, LogFormat, LogLevelSetting, LogTarget, STDOUT,
    Settings, apply_env_overrides, load_settings_from_path,
};
use clog_shared::{ErrorCode, ErrorEnvelope, SensitiveInfoHandling};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

fn fixture_path(relative: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join("testkit")
        .join("fixtures")
        .join(relative)
}

fn read_env_map(relative: &str) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
    let contents = fs::read_to_string(fixture_path(relative))?;
    Ok(serde_json::from_str(&contents)?)
}

#[test]
fn env_fixtures_merge_into_effective_settings() -> Result<(), Box<dyn Error>> {
    let env_map = read_env_map("env/clog-env.valid.json")?;
    let env = LogEnv::from_map(&env_map)?;

    let settings = apply_env_overrides(Settings::default(), &env);
    assert_eq!(settings.format, Some(LogFormat::Json));
    assert_eq!(settings.level, Some(LogLevelSetting::Debug));
    assert_eq!(
        settings.sensitive_info_handling,
        Some(SensitiveInfoHandling::Hash)
    );
    assert_eq!(
        settings.only_log_debug_if_contains_label,
        vec!["clabel_api_call", "clabel_cleanup"]
    );

    let resolver = LogFileResolver::new(
        std::env::temp_dir(),
        env.file.as_deref().map(ToOwned::to_owned),
    );
    let settings = settings.ensure_defaults_with(&resolver);
    assert_eq!(settings.file.as_deref(), Some(STDOUT));
    assert_eq!(settings.target(), LogTarget::Stdout);
    Ok(())
}

#[test]
fn invalid_env_fixture_is_rejected_with_metadata() -> Result<(), Box<dyn Error>> {
    let env_map = read_env_map("env/clog-env.invalid-level.json")?;
    let error = LogEnv::from_map(&env_map)
        .err()
        .ok_or_else(|| std::io::Error::other("expected env error"))?;
    assert!(matches!(error, EnvParseError::InvalidEnum { .. }));

    let envelope = ErrorEnvelope::from(error);
    assert_eq!(envelope.code, ErrorCode::new("config", "invalid_env_enum"));
    assert_eq!(
        envelope.metadata.get("value").map(String::as_str),
        Some("verbose")
    );
    Ok(())
}

#[test]
fn settings_files_load_in_both_formats() -> Result<(), Box<dyn Error>> {
    let json = load_settings_from_path(
        Some(&fixture_path("settings/settings.valid.json")),
        &LogEnv::default(),
    )?;
    assert_eq!(json.target(), LogTarget::Stderr);
    assert_eq!(json.sensitive_info_handling(), SensitiveInfoHandling::Mask);
    assert!(json.allows_debug_with(&["clabel_configuration"]));
    assert!(!json.allows_debug_with(&["clabel_cleanup"]));

    let toml = load_settings_from_path(
        Some(&fixture_path("settings/settings.valid.toml")),
        &LogEnv::default(),
    )?;
    assert_eq!(toml.format(), LogFormat::Json);
    assert_eq!(toml.level(), LogLevelSetting::Disabled);
    assert_eq!(toml.target(), LogTarget::Stdout);
    Ok(())
}

#[test]
fn explicit_settings_beat_env_values() -> Result<(), Box<dyn Error>> {
    let env_map = read_env_map("env/clog-env.valid.json")?;
    let env = LogEnv::from_map(&env_map)?;

    let settings = Settings::default()
        .with_format(LogFormat::Human)
        .with_debug_labels(["mine"]);
    let merged = apply_env_overrides(settings, &env);
    assert_eq!(merged.format, Some(LogFormat::Human));
    assert_eq!(merged.only_log_debug_if_contains_label, vec!["mine"]);
    Ok(())
}
