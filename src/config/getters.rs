//! Getter methods for `ExtractorConfig`

use regex::Regex;
use std::path::Path;
use std::time::Duration;

use super::types::ExtractorConfig;
use crate::extractor::ResourceCategory;

impl ExtractorConfig {
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_executable(&self) -> Option<&Path> {
        self.chrome_executable.as_deref()
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    #[must_use]
    pub fn overlay_timeout(&self) -> Duration {
        Duration::from_secs(self.overlay_timeout_secs)
    }

    #[must_use]
    pub fn locator_timeout(&self) -> Duration {
        Duration::from_secs(self.locator_timeout_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn overlay_selector(&self) -> &str {
        &self.overlay_selector
    }

    #[must_use]
    pub fn default_locator(&self) -> &str {
        &self.default_locator
    }

    #[must_use]
    pub fn video_host_pattern(&self) -> &str {
        &self.video_host_pattern
    }

    #[must_use]
    pub fn video_host_regex(&self) -> &Regex {
        &self.video_host_regex
    }

    #[must_use]
    pub fn fallback_url(&self) -> &str {
        &self.fallback_url
    }

    #[must_use]
    pub fn blocked_resources(&self) -> &[ResourceCategory] {
        &self.blocked_resources
    }

    /// `host:port` string suitable for `TcpListener::bind`
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
