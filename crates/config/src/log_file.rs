//! Log file resolution.
//!
//! Resolution order, highest first:
//! 1. an explicit, non-empty file argument
//! 2. the previously cached resolution
//! 3. the `CLOG_FILE` environment variable
//! 4. `<user logs dir>/clog/<UTC timestamp>.log`
//!
//! The chosen value is then normalized: `-` means standard output, and a
//! real path gets its parent directory created. When that fails the result
//! is standard error, so configuration never stops the process from logging.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

/// Env var: log output destination (`-` for standard output).
pub const ENV_LOG_FILE: &str = "CLOG_FILE";

/// Sentinel for standard output.
pub const STDOUT: &str = "stdout";
/// Sentinel for standard error.
pub const STDERR: &str = "stderr";

const DEFAULT_FILE_STAMP: &str = "%Y-%m-%dT%H-%M-%SZ";

/// Resolves and caches the log output destination.
#[derive(Debug)]
pub struct LogFileResolver {
    logs_dir: PathBuf,
    env_value: Option<String>,
    cached: Mutex<Option<String>>,
}

impl LogFileResolver {
    /// Create a resolver with an explicit logs dir and env override value.
    pub fn new(logs_dir: impl Into<PathBuf>, env_value: Option<String>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            env_value,
            cached: Mutex::new(None),
        }
    }

    /// Create a resolver from the current process environment.
    #[must_use]
    pub fn from_std_env() -> Self {
        Self::new(user_logs_dir(), std::env::var(ENV_LOG_FILE).ok())
    }

    /// Resolve the output destination.
    ///
    /// Explicit values are normalized but never cached; the first implicit
    /// resolution is cached and returned verbatim afterwards.
    pub fn resolve(&self, explicit: Option<&str>) -> String {
        if let Some(explicit) = non_empty(explicit) {
            return finalize(explicit);
        }

        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = cached.as_ref() {
            return previous.clone();
        }

        let raw = non_empty(self.env_value.as_deref())
            .map_or_else(|| default_log_location(&self.logs_dir), ToOwned::to_owned);
        let resolved = finalize(&raw);
        *cached = Some(resolved.clone());
        resolved
    }

    /// The cached implicit resolution, if any.
    pub fn cached(&self) -> Option<String> {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

static PROCESS_RESOLVER: OnceLock<LogFileResolver> = OnceLock::new();

/// Resolve the log file through the process-wide resolver.
///
/// Two calls without an explicit value return the identical string.
pub fn get_log_file_or_default(explicit: Option<&str>) -> String {
    PROCESS_RESOLVER
        .get_or_init(LogFileResolver::from_std_env)
        .resolve(explicit)
}

/// The process-wide cached resolution, if one happened yet.
pub fn resolved_log_file() -> Option<String> {
    PROCESS_RESOLVER.get().and_then(LogFileResolver::cached)
}

/// Default location for log file storage under `logs_dir`.
#[must_use]
pub fn default_log_location(logs_dir: &Path) -> String {
    let stamp = Utc::now().format(DEFAULT_FILE_STAMP);
    logs_dir
        .join("clog")
        .join(format!("{stamp}.log"))
        .to_string_lossy()
        .into_owned()
}

/// Platform log directory for the current user.
#[must_use]
pub fn user_logs_dir() -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    if cfg!(target_os = "macos") {
        if let Some(home) = home {
            return home.join("Library").join("Logs");
        }
    } else if let Some(state) = std::env::var_os("XDG_STATE_HOME").filter(|dir| !dir.is_empty()) {
        return PathBuf::from(state);
    } else if let Some(home) = home {
        return home.join(".local").join("state");
    }
    std::env::temp_dir()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn finalize(raw: &str) -> String {
    if raw == "-" || raw.eq_ignore_ascii_case(STDOUT) {
        return STDOUT.to_string();
    }
    if raw.eq_ignore_ascii_case(STDERR) {
        return STDERR.to_string();
    }

    let path = Path::new(raw);
    let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
        return raw.to_string();
    };
    match std::fs::create_dir_all(parent) {
        Ok(()) => raw.to_string(),
        Err(error) => {
            tracing::debug!(
                path = %parent.display(),
                %error,
                "log directory unavailable; falling back to stderr"
            );
            STDERR.to_string()
        },
    }
}
