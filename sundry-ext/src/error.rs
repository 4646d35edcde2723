//! Error types for parsing and keyed lookups.

use thiserror::Error;

/// Errors produced by the strict parsing helpers.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input could not be parsed as the requested type.
    #[error("Failed to parse '{input}' as {target}: {reason}")]
    Invalid {
        /// The offending input.
        input: String,
        /// The requested type name.
        target: &'static str,
        /// The underlying parser message.
        reason: String,
    },

    /// The input did not match the expected date/time layout.
    #[error("Failed to parse '{input}' as a date/time with format '{format}': {source}")]
    DateTime {
        /// The offending input.
        input: String,
        /// The layout that was tried last.
        format: String,
        /// The chrono parse error.
        #[source]
        source: chrono::ParseError,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors produced by [`StrictMap`](crate::StrictMap).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// The key was not present.
    #[error("The given key '{0}' was not present in the map")]
    MissingKey(String),

    /// The key was already present on insert.
    #[error("An item with the key '{0}' has already been added")]
    DuplicateKey(String),
}
