//! Error types for the Oracle codecs
//!
//! Encoding a NUMBER from text and decoding a DATE from JSON are the only
//! operations that can reject their input. Everything else is total, apart
//! from the slice entry points that have to check a caller-supplied length.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the codecs
#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum Error {
    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Input text is not accepted by the grammar
    #[error("invalid format {input:?}: {reason}")]
    InvalidFormat { input: String, reason: String },

    /// Value cannot be represented in the target format
    #[error("value {input:?} out of range: {reason}")]
    Overflow { input: String, reason: String },

    // =========================================================================
    // Buffer Errors
    // =========================================================================
    /// Caller-supplied buffer has the wrong length
    #[error("invalid {kind} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        kind: &'static str,
        expected: &'static str,
        actual: usize,
    },

    // =========================================================================
    // Serialization Errors
    // =========================================================================
    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid format error for the given input
    pub fn invalid_format(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an overflow error for the given input
    pub fn overflow(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Overflow {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is an invalid format error
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, Error::InvalidFormat { .. })
    }

    /// Check if this is an overflow error
    pub fn is_overflow(&self) -> bool {
        matches!(self, Error::Overflow { .. })
    }
}
