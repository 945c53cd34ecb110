//! Core configuration types for the extraction service
//!
//! This module contains the main `ExtractorConfig` struct and the error type
//! produced while building or loading it.

use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::extractor::ResourceCategory;

/// Main configuration struct for the extraction service
#[derive(Debug, Clone, Serialize)]
pub struct ExtractorConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) headless: bool,

    /// Explicit Chrome/Chromium binary. When `None` the binary is discovered
    /// from `CHROMIUM_PATH`, well-known install paths and `which`.
    pub(crate) chrome_executable: Option<PathBuf>,

    /// Timeout in seconds for page navigation
    ///
    /// Exceeding it ends the request with a navigation failure.
    ///
    /// Default: 30 seconds
    pub(crate) navigation_timeout_secs: u64,

    /// Timeout in seconds for the loading overlay to become hidden
    ///
    /// Exceeding it is logged and the locator step runs anyway.
    ///
    /// Default: 10 seconds
    pub(crate) overlay_timeout_secs: u64,

    /// Timeout in seconds for the target element to become visible
    ///
    /// Default: 15 seconds
    pub(crate) locator_timeout_secs: u64,

    /// Delay between DOM probes while polling
    pub(crate) poll_interval_ms: u64,

    pub(crate) overlay_selector: String,
    pub(crate) default_locator: String,

    /// Source of `video_host_regex`, kept for logging and serialization
    pub(crate) video_host_pattern: String,

    /// Compiled once at config creation to keep regex compilation off the request path
    #[serde(skip)]
    pub(crate) video_host_regex: Regex,

    pub(crate) fallback_url: String,
    pub(crate) blocked_resources: Vec<ResourceCategory>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        // The builder defaults are all valid, so this cannot fail
        Self::builder()
            .build()
            .unwrap_or_else(|e| unreachable!("default extractor config is invalid: {e}"))
    }
}

/// Errors raised while building or loading an [`ExtractorConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid video host pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Fallback URL '{0}' is not an absolute http(s) URL")]
    InvalidFallbackUrl(String),

    #[error("{name} must be greater than zero")]
    ZeroTimeout { name: &'static str },

    #[error("{name} must not be empty")]
    Empty { name: &'static str },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
