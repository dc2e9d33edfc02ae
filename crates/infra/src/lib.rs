//! # clog-infra
//!
//! Logger composition: settings in, a ready logger handle out.
//! This crate depends on `adapters`, `config`, `ports` and `shared`.

/// Environment validation helpers.
pub mod env_check;
/// Logger construction from settings.
pub mod logger_factory;
/// Process-wide logger instance.
pub mod singleton;

pub use env_check::{
    EnvCache, InfraError, InfraResult, env_or_default, settings_with_std_env, validate_env_parsing,
};
pub use logger_factory::{Logger, build_logger, fallback_logger, level_filter, try_build_logger};
pub use singleton::{LoggerCell, SEEDING_MESSAGE, existing_singleton, singleton};

/// Returns the infra crate version.
#[must_use]
pub const fn infra_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
