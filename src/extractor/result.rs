//! Terminal states of an extraction and their uniform result payload
//!
//! Every request ends in exactly one [`ExtractionOutcome`]. The outcome is
//! folded into an [`ExtractionResult`] whose `video_url` is always populated:
//! the recovered link, the requested URL, or the static fallback.

use serde::Serialize;
use std::fmt;

/// Why a link could not be recovered. Logged only; never sent to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// Nothing matched (or nothing visible) within the locator ceiling
    NotFound,
    /// The locator is not a valid path expression
    InvalidExpression(String),
    /// An element matched but its href is empty, malformed or off-domain
    InvalidHref(String),
    /// The DOM could not be queried
    ProbeFailed(String),
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no visible element matched the locator"),
            Self::InvalidExpression(msg) => write!(f, "invalid locator expression: {msg}"),
            Self::InvalidHref(href) => write!(f, "element href '{href}' is not a video link"),
            Self::ProbeFailed(msg) => write!(f, "DOM probe failed: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Success {
        video_url: String,
    },
    LocatorMiss {
        requested_url: String,
        reason: MissReason,
    },
    NavigationFailure {
        requested_url: String,
        message: String,
    },
    Fatal {
        message: String,
    },
}

impl ExtractionOutcome {
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }

    /// Short state name for logs
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::LocatorMiss { .. } => "locator_miss",
            Self::NavigationFailure { .. } => "navigation_failure",
            Self::Fatal { .. } => "fatal",
        }
    }

    #[must_use]
    pub fn into_result(self, fallback_url: &str) -> ExtractionResult {
        match self {
            Self::Success { video_url } => ExtractionResult {
                succeeded: true,
                video_url,
                autoplay_eligible: true,
                error_message: None,
            },
            Self::LocatorMiss { requested_url, .. } => ExtractionResult {
                succeeded: false,
                video_url: requested_url,
                autoplay_eligible: false,
                error_message: None,
            },
            Self::NavigationFailure {
                requested_url,
                message,
            } => ExtractionResult {
                succeeded: false,
                video_url: requested_url,
                autoplay_eligible: false,
                error_message: Some(message),
            },
            Self::Fatal { message } => ExtractionResult {
                succeeded: false,
                video_url: fallback_url.to_string(),
                autoplay_eligible: false,
                error_message: Some(message),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub succeeded: bool,
    pub video_url: String,
    pub autoplay_eligible: bool,
    pub error_message: Option<String>,
}
