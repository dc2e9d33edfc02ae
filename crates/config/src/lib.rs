//! # clog-config
//!
//! Logging settings, their defaulting rules, env overrides and log file
//! resolution. This crate depends on `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Settings loading helpers (file + env).
pub mod load;
/// Log file resolution and caching.
pub mod log_file;
/// Settings types and defaulting.
pub mod settings;

pub use env::{
    ENV_DEBUG_LABELS, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_SENSITIVE_INFO_HANDLING, EnvParseError,
    LogEnv, apply_env_overrides,
};
pub use load::{
    load_settings_from_path, load_settings_from_sources, load_settings_std_env, to_pretty_json,
    to_pretty_toml,
};
pub use log_file::{
    ENV_LOG_FILE, LogFileResolver, STDERR, STDOUT, default_log_location, get_log_file_or_default,
    resolved_log_file, user_logs_dir,
};
pub use settings::{LogFormat, LogLevelSetting, LogTarget, Settings, UnknownValue};
