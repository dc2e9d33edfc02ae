//! # clog
//!
//! Context-carried structured logging.
//!
//! A [`LogContext`] carries a logger handle and contextual clues through a
//! request; [`ctx`] starts a per-call [`Builder`] that gathers an error,
//! pairs, labels and comments, and emits one record on `debug`, `info` or
//! `error`.
//!
//! ```no_run
//! use clog::{LogContext, Settings, ctx, init, labels};
//!
//! let (request, _logger) = init(LogContext::new(), &Settings::default());
//! let request = request.with_clue("request_id", "req_123");
//! ctx(&request)
//!     .label([labels::START_OF_RUN])
//!     .with("attempt", 1)
//!     .info("starting");
//! clog::flush(&request);
//! ```
//!
//! This crate depends on `infra`, `config`, `ports` and `shared`.

pub mod builder;
pub mod context;
pub mod labels;
pub mod wrapper;
pub mod writer;

pub use builder::{Builder, ctx, ctx_err};
pub use context::{LogContext, ctx_or_seed, flush, init};
pub use wrapper::{WrapOptions, Wrapper, wrap};
pub use writer::Writer;

pub use clog_config::{
    LogFormat, LogLevelSetting, Settings, load_settings_from_path, load_settings_std_env,
};
pub use clog_infra::{Logger, SEEDING_MESSAGE, validate_env_parsing};
pub use clog_ports::{LogEvent, LogFields, LogLevel, LoggableError, LoggerPort};
pub use clog_shared::{ErrorCode, ErrorEnvelope, SensitiveInfoHandling};

/// Returns the facade crate version.
#[must_use]
pub const fn facade_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
