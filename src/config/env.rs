//! Environment overrides for `ExtractorConfig`
//!
//! Every variable is optional; unset variables keep the builder default.
//! Lookup goes through a closure so tests can supply a map instead of
//! mutating the process environment.

use std::str::FromStr;

use super::builder::ExtractorConfigBuilder;
use super::types::{ConfigError, ExtractorConfig};
use crate::extractor::ResourceCategory;

pub const ENV_HOST: &str = "EXTRACTOR_HOST";
pub const ENV_PORT: &str = "EXTRACTOR_PORT";
/// Generic port variable honoured by most hosting platforms
pub const ENV_PORT_FALLBACK: &str = "PORT";
pub const ENV_HEADLESS: &str = "EXTRACTOR_HEADLESS";
pub const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";
pub const ENV_NAVIGATION_TIMEOUT: &str = "EXTRACTOR_NAVIGATION_TIMEOUT_SECS";
pub const ENV_OVERLAY_TIMEOUT: &str = "EXTRACTOR_OVERLAY_TIMEOUT_SECS";
pub const ENV_LOCATOR_TIMEOUT: &str = "EXTRACTOR_LOCATOR_TIMEOUT_SECS";
pub const ENV_POLL_INTERVAL: &str = "EXTRACTOR_POLL_INTERVAL_MS";
pub const ENV_DEFAULT_LOCATOR: &str = "EXTRACTOR_DEFAULT_LOCATOR";
pub const ENV_OVERLAY_SELECTOR: &str = "EXTRACTOR_OVERLAY_SELECTOR";
pub const ENV_VIDEO_HOST_PATTERN: &str = "EXTRACTOR_VIDEO_HOST_PATTERN";
pub const ENV_FALLBACK_URL: &str = "EXTRACTOR_FALLBACK_URL";
pub const ENV_BLOCKED_RESOURCES: &str = "EXTRACTOR_BLOCKED_RESOURCES";

impl ExtractorConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut builder: ExtractorConfigBuilder = Self::builder();

        if let Some(host) = get(ENV_HOST) {
            builder = builder.host(host.trim());
        }
        if let Some(port) = get(ENV_PORT).map(|v| (ENV_PORT, v)).or_else(|| {
            get(ENV_PORT_FALLBACK).map(|v| (ENV_PORT_FALLBACK, v))
        }) {
            builder = builder.port(parse_number(port.0, &port.1)?);
        }
        if let Some(headless) = get(ENV_HEADLESS) {
            builder = builder.headless(parse_bool(ENV_HEADLESS, &headless)?);
        }
        if let Some(path) = get(ENV_CHROMIUM_PATH) {
            builder = builder.chrome_executable(path.trim());
        }
        if let Some(secs) = get(ENV_NAVIGATION_TIMEOUT) {
            builder = builder.navigation_timeout_secs(parse_number(ENV_NAVIGATION_TIMEOUT, &secs)?);
        }
        if let Some(secs) = get(ENV_OVERLAY_TIMEOUT) {
            builder = builder.overlay_timeout_secs(parse_number(ENV_OVERLAY_TIMEOUT, &secs)?);
        }
        if let Some(secs) = get(ENV_LOCATOR_TIMEOUT) {
            builder = builder.locator_timeout_secs(parse_number(ENV_LOCATOR_TIMEOUT, &secs)?);
        }
        if let Some(millis) = get(ENV_POLL_INTERVAL) {
            builder = builder.poll_interval_ms(parse_number(ENV_POLL_INTERVAL, &millis)?);
        }
        if let Some(locator) = get(ENV_DEFAULT_LOCATOR) {
            builder = builder.default_locator(locator);
        }
        if let Some(selector) = get(ENV_OVERLAY_SELECTOR) {
            builder = builder.overlay_selector(selector);
        }
        if let Some(pattern) = get(ENV_VIDEO_HOST_PATTERN) {
            builder = builder.video_host_pattern(pattern);
        }
        if let Some(url) = get(ENV_FALLBACK_URL) {
            builder = builder.fallback_url(url.trim());
        }
        // An explicitly empty list disables interception, so read it unfiltered
        if let Some(list) = lookup(ENV_BLOCKED_RESOURCES) {
            builder = builder.blocked_resources(parse_categories(&list)?);
        }

        builder.build()
    }
}

fn parse_number<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true/false".to_string(),
        }),
    }
}

fn parse_categories(list: &str) -> Result<Vec<ResourceCategory>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<ResourceCategory>()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: ENV_BLOCKED_RESOURCES.to_string(),
                    value: s.to_string(),
                    reason,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = ExtractorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port(), 3001);
        assert!(config.headless());
        assert_eq!(config.overlay_selector(), "#loadingOverlay");
        assert_eq!(
            config.blocked_resources(),
            &[
                ResourceCategory::Stylesheet,
                ResourceCategory::Image,
                ResourceCategory::Font
            ]
        );
    }

    #[test]
    fn default_video_host_accepts_subdomains_only() {
        let config = ExtractorConfig::from_lookup(lookup(&[])).unwrap();
        let host = config.video_host_regex();
        assert!(host.is_match("https://tv.naver.com/v/123"));
        assert!(host.is_match("https://m.tv.naver.com/v/123"));
        assert!(!host.is_match("https://tv.naver.com.evil.test/v/123"));
        assert!(!host.is_match("https://eviltv.naver.com/v/123"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = ExtractorConfig::from_lookup(lookup(&[
            (ENV_PORT, "8080"),
            (ENV_HEADLESS, "off"),
            (ENV_LOCATOR_TIMEOUT, "5"),
            (ENV_VIDEO_HOST_PATTERN, r"^https://videohost\.example/v/"),
            (ENV_CHROMIUM_PATH, "/opt/chrome/chrome"),
        ]))
        .unwrap();

        assert_eq!(config.port(), 8080);
        assert!(!config.headless());
        assert_eq!(config.locator_timeout().as_secs(), 5);
        assert!(config.video_host_regex().is_match("https://videohost.example/v/abc"));
        assert_eq!(
            config.chrome_executable().map(|p| p.to_string_lossy().into_owned()),
            Some("/opt/chrome/chrome".to_string())
        );
    }

    #[test]
    fn generic_port_variable_is_a_fallback() {
        let config = ExtractorConfig::from_lookup(lookup(&[(ENV_PORT_FALLBACK, "9000")])).unwrap();
        assert_eq!(config.port(), 9000);

        let config = ExtractorConfig::from_lookup(lookup(&[
            (ENV_PORT_FALLBACK, "9000"),
            (ENV_PORT, "9100"),
        ]))
        .unwrap();
        assert_eq!(config.port(), 9100);
    }

    #[test]
    fn empty_blocked_list_disables_filtering() {
        let config = ExtractorConfig::from_lookup(lookup(&[(ENV_BLOCKED_RESOURCES, "")])).unwrap();
        assert!(config.blocked_resources().is_empty());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            ExtractorConfig::from_lookup(lookup(&[(ENV_PORT, "eighty")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            ExtractorConfig::from_lookup(lookup(&[(ENV_HEADLESS, "maybe")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            ExtractorConfig::from_lookup(lookup(&[(ENV_VIDEO_HOST_PATTERN, "(unclosed")])),
            Err(ConfigError::InvalidPattern { .. })
        ));
        assert!(matches!(
            ExtractorConfig::from_lookup(lookup(&[(ENV_NAVIGATION_TIMEOUT, "0")])),
            Err(ConfigError::ZeroTimeout { .. })
        ));
        assert!(matches!(
            ExtractorConfig::from_lookup(lookup(&[(ENV_BLOCKED_RESOURCES, "image,video")])),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
