//! Fluent builder for `ExtractorConfig`
//!
//! Every field has a default, so `ExtractorConfig::builder().build()` always
//! succeeds. Validation (regex compilation, URL and timeout checks) happens
//! once in [`ExtractorConfigBuilder::build`].

use regex::Regex;
use std::path::PathBuf;

use super::types::{ConfigError, ExtractorConfig};
use crate::extractor::ResourceCategory;
use crate::utils::{
    DEFAULT_FALLBACK_URL, DEFAULT_HOST, DEFAULT_LOCATOR, DEFAULT_LOCATOR_TIMEOUT_SECS,
    DEFAULT_NAVIGATION_TIMEOUT_SECS, DEFAULT_OVERLAY_SELECTOR, DEFAULT_OVERLAY_TIMEOUT_SECS,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_PORT, DEFAULT_VIDEO_HOST_PATTERN, is_valid_url,
};

#[derive(Debug, Clone)]
pub struct ExtractorConfigBuilder {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) headless: bool,
    pub(crate) chrome_executable: Option<PathBuf>,
    pub(crate) navigation_timeout_secs: u64,
    pub(crate) overlay_timeout_secs: u64,
    pub(crate) locator_timeout_secs: u64,
    pub(crate) poll_interval_ms: u64,
    pub(crate) overlay_selector: String,
    pub(crate) default_locator: String,
    pub(crate) video_host_pattern: String,
    pub(crate) fallback_url: String,
    pub(crate) blocked_resources: Vec<ResourceCategory>,
}

impl Default for ExtractorConfigBuilder {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            headless: true,
            chrome_executable: None,
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            overlay_timeout_secs: DEFAULT_OVERLAY_TIMEOUT_SECS,
            locator_timeout_secs: DEFAULT_LOCATOR_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            overlay_selector: DEFAULT_OVERLAY_SELECTOR.to_string(),
            default_locator: DEFAULT_LOCATOR.to_string(),
            video_host_pattern: DEFAULT_VIDEO_HOST_PATTERN.to_string(),
            fallback_url: DEFAULT_FALLBACK_URL.to_string(),
            blocked_resources: ResourceCategory::NON_ESSENTIAL.to_vec(),
        }
    }
}

impl ExtractorConfig {
    #[must_use]
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::default()
    }
}

impl ExtractorConfigBuilder {
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    #[must_use]
    pub fn navigation_timeout_secs(mut self, secs: u64) -> Self {
        self.navigation_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn overlay_timeout_secs(mut self, secs: u64) -> Self {
        self.overlay_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn locator_timeout_secs(mut self, secs: u64) -> Self {
        self.locator_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn poll_interval_ms(mut self, millis: u64) -> Self {
        self.poll_interval_ms = millis;
        self
    }

    #[must_use]
    pub fn overlay_selector(mut self, selector: impl Into<String>) -> Self {
        self.overlay_selector = selector.into();
        self
    }

    #[must_use]
    pub fn default_locator(mut self, locator: impl Into<String>) -> Self {
        self.default_locator = locator.into();
        self
    }

    #[must_use]
    pub fn video_host_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.video_host_pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn fallback_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_url = url.into();
        self
    }

    #[must_use]
    pub fn blocked_resources(mut self, categories: impl IntoIterator<Item = ResourceCategory>) -> Self {
        self.blocked_resources = categories.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<ExtractorConfig, ConfigError> {
        let video_host_regex =
            Regex::new(&self.video_host_pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: self.video_host_pattern.clone(),
                source,
            })?;

        if !is_valid_url(&self.fallback_url) {
            return Err(ConfigError::InvalidFallbackUrl(self.fallback_url));
        }

        for (name, value) in [
            ("navigation timeout", self.navigation_timeout_secs),
            ("overlay timeout", self.overlay_timeout_secs),
            ("locator timeout", self.locator_timeout_secs),
            ("poll interval", self.poll_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroTimeout { name });
            }
        }

        if self.default_locator.trim().is_empty() {
            return Err(ConfigError::Empty {
                name: "default locator",
            });
        }
        if self.overlay_selector.trim().is_empty() {
            return Err(ConfigError::Empty {
                name: "overlay selector",
            });
        }

        let mut blocked_resources = self.blocked_resources;
        blocked_resources.sort();
        blocked_resources.dedup();

        Ok(ExtractorConfig {
            host: self.host,
            port: self.port,
            headless: self.headless,
            chrome_executable: self.chrome_executable,
            navigation_timeout_secs: self.navigation_timeout_secs,
            overlay_timeout_secs: self.overlay_timeout_secs,
            locator_timeout_secs: self.locator_timeout_secs,
            poll_interval_ms: self.poll_interval_ms,
            overlay_selector: self.overlay_selector,
            default_locator: self.default_locator,
            video_host_pattern: self.video_host_pattern,
            video_host_regex,
            fallback_url: self.fallback_url,
            blocked_resources,
        })
    }
}
