//! # clog-shared
//!
//! Shared error envelope and sensitive-value helpers for the clog workspace.
//!
//! This crate provides foundational types that are used across all other crates:
//!
//! - The annotated error envelope (message + metadata + labels)
//! - Secret-key detection and sensitive-value concealment
//!
//! ## Design Principles
//!
//! 1. **No workspace dependencies** - This crate only depends on external crates
//! 2. **Serde-compatible** - All public types support serialization

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod redaction;

pub use errors::{
    ErrorCode, ErrorEnvelope, ErrorKind, ErrorLabels, ErrorMetadata, REDACTED_VALUE,
    redact_metadata,
};
pub use redaction::{MASKED, SensitiveInfoHandling, UnknownHandling, is_secret_key};

/// Shared result type used across the workspace.
pub type Result<T, E = ErrorEnvelope> = std::result::Result<T, E>;

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
