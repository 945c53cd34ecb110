//! Error types for extraction operations
//!
//! `LocatorMiss` is deliberately absent: a missing or invalid link is an
//! expected outcome and is modelled by
//! [`ExtractionOutcome`](crate::extractor::ExtractionOutcome) instead.

use thiserror::Error;

/// Convenience alias for Result with [`ExtractError`]
pub type ExtractResult<T> = Result<T, ExtractError>;

#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// Caller error; surfaced as HTTP 400 and never retried
    #[error("{0}")]
    InvalidRequest(String),

    /// The browser could not be launched (missing binary, bad profile dir, ...)
    #[error("Browser environment error: {0}")]
    Environment(String),

    /// Navigation failed or exceeded its ceiling
    #[error("Navigation to {url} failed: {message}")]
    NavigationTimeout { url: String, message: String },

    /// A CDP command failed
    #[error("Browser error: {0}")]
    Browser(String),

    /// Anything else, including a panicked extraction task
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtractError {
    /// HTTP status the error maps to when it escapes the pipeline
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            _ => 500,
        }
    }
}

impl From<anyhow::Error> for ExtractError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::Browser(format!("{err:#}"))
    }
}
