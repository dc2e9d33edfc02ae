//! Test fixtures for shared error codes and envelopes.

use clog_shared::{ErrorCode, ErrorEnvelope};

/// Return a list of common error codes used in tests.
pub fn common_error_codes() -> Vec<ErrorCode> {
    vec![
        ErrorCode::invalid_input(),
        ErrorCode::not_found(),
        ErrorCode::permission_denied(),
        ErrorCode::io(),
        ErrorCode::internal(),
    ]
}

/// An invalid input error fixture.
pub fn invalid_input_error() -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::invalid_input(), "invalid input")
}

/// An error carrying clues and labels, shaped like the builder fixtures:
/// `foo: baz`, `fnords: smarf`, label `errLabel`.
pub fn clued_error() -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::internal(), "an error")
        .with_metadata("foo", "baz")
        .with_metadata("fnords", "smarf")
        .with_label("errLabel")
}
