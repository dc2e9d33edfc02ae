//! Environment validation helpers for logger setup.

use clog_config::{EnvParseError, LogEnv, Settings, apply_env_overrides};
use clog_shared::ErrorEnvelope;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Infra-level error type (shared error envelope).
pub type InfraError = ErrorEnvelope;

/// Infra-level result type.
pub type InfraResult<T> = Result<T, InfraError>;

/// Validate that the provided env overrides can be parsed and merged into settings.
pub fn validate_env_parsing(env: &BTreeMap<String, String>) -> InfraResult<()> {
    let parsed = LogEnv::from_map(env).map_err(ErrorEnvelope::from)?;
    let _ = apply_env_overrides(Settings::default(), &parsed);
    Ok(())
}

/// Env overrides parsed at most once.
#[derive(Debug, Default)]
pub struct EnvCache {
    parsed: OnceLock<LogEnv>,
}

impl EnvCache {
    /// Create an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parsed: OnceLock::new(),
        }
    }

    /// Return the cached overrides, running `parse` on first use.
    ///
    /// A parse failure is reported on stderr once and leaves no overrides.
    pub fn get_or_parse<F>(&self, parse: F) -> &LogEnv
    where
        F: FnOnce() -> Result<LogEnv, EnvParseError>,
    {
        self.parsed.get_or_init(|| {
            parse().unwrap_or_else(|error| {
                let envelope = ErrorEnvelope::from(error);
                eprintln!("ignoring logging env overrides: {envelope}");
                LogEnv::default()
            })
        })
    }
}

static PROCESS_ENV: EnvCache = EnvCache::new();

/// Parse the process environment, reporting failures on stderr.
///
/// A malformed variable never prevents logging: the report names the
/// variable and every override is dropped. The environment is read once
/// per process.
pub fn env_or_default() -> LogEnv {
    PROCESS_ENV.get_or_parse(LogEnv::from_std_env).clone()
}

/// Apply the process environment to `settings` (unset fields only).
pub fn settings_with_std_env(settings: Settings) -> Settings {
    apply_env_overrides(settings, PROCESS_ENV.get_or_parse(LogEnv::from_std_env))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clog_config::{ENV_LOG_FORMAT, ENV_LOG_LEVEL};
    use clog_config::LogLevelSetting;
    use clog_shared::ErrorCode;
    use std::cell::Cell;

    #[test]
    fn valid_env_passes() -> Result<(), Box<dyn std::error::Error>> {
        let mut env = BTreeMap::new();
        env.insert(ENV_LOG_LEVEL.to_string(), "debug".to_string());
        validate_env_parsing(&env)?;
        Ok(())
    }

    #[test]
    fn invalid_env_reports_envelope() -> Result<(), Box<dyn std::error::Error>> {
        let mut env = BTreeMap::new();
        env.insert(ENV_LOG_FORMAT.to_string(), "yaml".to_string());
        let error = validate_env_parsing(&env)
            .err()
            .ok_or_else(|| std::io::Error::other("expected env error"))?;
        assert_eq!(error.code, ErrorCode::new("config", "invalid_env_enum"));
        Ok(())
    }

    #[test]
    fn env_cache_parses_once() {
        let cache = EnvCache::new();
        let parses = Cell::new(0);
        let parse = || {
            parses.set(parses.get() + 1);
            let mut env = BTreeMap::new();
            env.insert(ENV_LOG_LEVEL.to_string(), "debug".to_string());
            LogEnv::from_map(&env)
        };

        let first = cache.get_or_parse(parse).clone();
        let second = cache.get_or_parse(parse).clone();

        assert_eq!(parses.get(), 1);
        assert_eq!(first, second);
        let settings = apply_env_overrides(Settings::default(), &first);
        assert_eq!(settings.level, Some(LogLevelSetting::Debug));
    }

    #[test]
    fn env_cache_keeps_no_overrides_after_a_failure() {
        let cache = EnvCache::new();
        let parses = Cell::new(0);
        let parse = || {
            parses.set(parses.get() + 1);
            let mut env = BTreeMap::new();
            env.insert(ENV_LOG_LEVEL.to_string(), "bogus".to_string());
            LogEnv::from_map(&env)
        };

        for _ in 0..3 {
            assert_eq!(cache.get_or_parse(parse), &LogEnv::default());
        }
        assert_eq!(parses.get(), 1);
    }
}
