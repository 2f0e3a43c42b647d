//! Dictionary error types.

use thiserror::Error;

/// Errors that can occur while building a tag dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The dictionary document is not valid JSON or has the wrong shape.
    #[error("Failed to parse dictionary JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The dictionary document does not satisfy the dictionary schema.
    #[error("Dictionary validation failed: {0}")]
    Validation(String),

    /// A regular expression in a tag definition does not compile.
    #[error("Invalid pattern '{pattern}' in tag [{tag}]: {message}")]
    InvalidPattern {
        /// Tag whose definition holds the pattern.
        tag: String,
        /// The offending pattern source.
        pattern: String,
        /// Compiler message.
        message: String,
    },

    /// A tag definition refers to a tag the dictionary does not define.
    #[error("Tag [{tag}] refers to unknown tag [{reference}]")]
    UnknownReference {
        /// Tag whose definition holds the reference.
        tag: String,
        /// The missing tag name.
        reference: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DictionaryError {
    /// Creates a schema validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an invalid pattern error.
    pub fn invalid_pattern(
        tag: impl Into<String>,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidPattern {
            tag: tag.into(),
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown reference error.
    pub fn unknown_reference(tag: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::UnknownReference {
            tag: tag.into(),
            reference: reference.into(),
        }
    }
}
