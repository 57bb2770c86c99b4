//! Core error types for libscout

use thiserror::Error;

/// Result type alias for libscout operations
pub type ScoutResult<T> = Result<T, ScoutError>;

/// Main error type for libscout
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoutError {
    /// An upsert input failed schema validation. The store is left unchanged
    /// and the same input must not be retried.
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },
}

impl ScoutError {
    /// Stable code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "SCOUT_VALIDATION",
            Self::Config { .. } => "SCOUT_CONFIG",
            Self::Json { .. } => "SCOUT_JSON",
            Self::Io { .. } => "SCOUT_IO",
        }
    }

    /// Human-readable message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. } => message,
            Self::Config { message, .. } => message,
            Self::Json { message } => message,
            Self::Io { message, .. } => message,
        }
    }

    /// Validation errors describe bad caller input; nothing is worth retrying
    /// inside the cache.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
