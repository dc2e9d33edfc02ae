//! Secret detection and sensitive-value concealment.
//!
//! Provides consistent logic for detecting sensitive keys and concealing
//! their values before they reach a log sink.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Placeholder written in place of masked values.
pub const MASKED: &str = "***";

/// Number of hex characters kept from a value hash.
const HASH_PREFIX_LEN: usize = 16;

/// Name segments that mark a key as secret on their own.
const SECRET_SEGMENTS: [&str; 9] = [
    "TOKEN",
    "SECRET",
    "PASSWORD",
    "PASSWD",
    "CREDENTIAL",
    "CREDENTIALS",
    "AUTH",
    "AUTHORIZATION",
    "APIKEY",
];

/// Segments that mark a key as secret when directly followed by `KEY`.
const KEY_QUALIFIERS: [&str; 4] = ["API", "PRIVATE", "ACCESS", "SIGNING"];

/// Checks if a key/variable name likely refers to a secret.
///
/// The name is split on `_`, `-`, `.` and whitespace, and each segment is
/// compared case-insensitively. Substrings inside a segment never match, so
/// `author` and `monkey_count` are not secrets.
///
/// # Examples
///
/// ```
/// use clog_shared::is_secret_key;
///
/// assert!(is_secret_key("API_KEY"));
/// assert!(is_secret_key("password"));
/// assert!(!is_secret_key("LOG_LEVEL"));
/// assert!(!is_secret_key("author"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let segments: Vec<String> = key
        .split(|ch: char| matches!(ch, '_' | '-' | '.') || ch.is_whitespace())
        .filter(|segment| !segment.is_empty())
        .map(str::to_ascii_uppercase)
        .collect();

    let named_secret = segments
        .iter()
        .any(|segment| SECRET_SEGMENTS.contains(&segment.as_str()));
    let qualified_key = segments.windows(2).any(|pair| match pair {
        [qualifier, last] => last.as_str() == "KEY" && KEY_QUALIFIERS.contains(&qualifier.as_str()),
        _ => false,
    });
    named_secret || qualified_key
}

/// How values flagged as sensitive are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensitiveInfoHandling {
    /// Values are written as-is.
    #[default]
    PlainText,
    /// Values are replaced with a flat mask.
    Mask,
    /// Values are replaced with a short SHA-256 digest.
    Hash,
}

impl SensitiveInfoHandling {
    /// All accepted values, in declaration order.
    pub const ALL: [Self; 3] = [Self::PlainText, Self::Mask, Self::Hash];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlainText => "plaintext",
            Self::Mask => "mask",
            Self::Hash => "hash",
        }
    }

    /// Parse a value, returning `None` for anything unrecognized.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Option<Self> {
        value.parse().ok()
    }

    /// Conceal a text value.
    #[must_use]
    pub fn conceal_text(self, value: &str) -> String {
        match self {
            Self::PlainText => value.to_string(),
            Self::Mask => MASKED.to_string(),
            Self::Hash => short_hash(value),
        }
    }

    /// Conceal a JSON value. Plaintext leaves the value untouched, including
    /// its type; the other strategies always produce a string.
    #[must_use]
    pub fn conceal_value(self, value: Value) -> Value {
        match self {
            Self::PlainText => value,
            Self::Mask => Value::String(MASKED.to_string()),
            Self::Hash => {
                let text = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                Value::String(short_hash(&text))
            },
        }
    }
}

impl fmt::Display for SensitiveInfoHandling {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Error returned when a sensitive-info handling name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownHandling(pub String);

impl fmt::Display for UnknownHandling {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "unknown sensitive info handling: {}", self.0)
    }
}

impl std::error::Error for UnknownHandling {}

impl FromStr for SensitiveInfoHandling {
    type Err = UnknownHandling;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|handling| handling.as_str() == normalized)
            .ok_or_else(|| UnknownHandling(value.to_string()))
    }
}

fn short_hash(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let mut digest = format!("{:x}", hasher.finalize());
    digest.truncate(HASH_PREFIX_LEN);
    digest
}
