//! Inbound request validation

use serde::Deserialize;
use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::utils::is_valid_url;

pub const URL_REQUIRED: &str = "URL is required.";
pub const URL_NOT_ABSOLUTE: &str = "URL must be an absolute http(s) URL.";

/// Request body as received on the wire
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExtractionRequest {
    #[serde(default)]
    pub url: Option<String>,

    /// Path expression of the target anchor. Older clients send it as `xpath`.
    #[serde(default, alias = "xpath")]
    pub locator: Option<String>,
}

/// Validated request: an absolute target URL plus the locator to use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub target_url: String,
    pub locator: String,
    /// Whether `locator` was substituted from configuration
    pub locator_defaulted: bool,
}

impl ExtractionRequest {
    /// Parse and validate a raw JSON body. An empty body counts as `{}`.
    pub fn from_body(body: &[u8], default_locator: &str) -> ExtractResult<Self> {
        let raw = if body.iter().all(u8::is_ascii_whitespace) {
            RawExtractionRequest::default()
        } else {
            serde_json::from_slice::<RawExtractionRequest>(body).map_err(|e| {
                ExtractError::InvalidRequest(format!("Request body must be valid JSON: {e}"))
            })?
        };
        Self::validate(raw, default_locator)
    }

    pub fn validate(raw: RawExtractionRequest, default_locator: &str) -> ExtractResult<Self> {
        let target_url = raw
            .url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ExtractError::InvalidRequest(URL_REQUIRED.to_string()))?;

        if !is_valid_url(&target_url) {
            return Err(ExtractError::InvalidRequest(URL_NOT_ABSOLUTE.to_string()));
        }

        let (locator, locator_defaulted) = match raw.locator.map(|l| l.trim().to_string()) {
            Some(locator) if !locator.is_empty() => (locator, false),
            _ => {
                debug!("No locator supplied, using default: {}", default_locator);
                (default_locator.to_string(), true)
            }
        };

        Ok(Self {
            target_url,
            locator,
            locator_defaulted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: &str = "//a[@id='play-all']";

    #[test]
    fn missing_url_is_rejected() {
        let err = ExtractionRequest::from_body(br#"{"locator": "//a"}"#, DEFAULT).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidRequest(ref m) if m == URL_REQUIRED));

        let err = ExtractionRequest::from_body(br#"{"url": "   "}"#, DEFAULT).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidRequest(ref m) if m == URL_REQUIRED));
    }

    #[test]
    fn empty_body_is_treated_as_missing_url() {
        let err = ExtractionRequest::from_body(b"", DEFAULT).unwrap_err();
        assert_eq!(err.to_string(), URL_REQUIRED);
    }

    #[test]
    fn relative_url_is_rejected() {
        let err = ExtractionRequest::from_body(br#"{"url": "/playlist/1"}"#, DEFAULT).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidRequest(ref m) if m == URL_NOT_ABSOLUTE));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = ExtractionRequest::from_body(b"{url:", DEFAULT).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidRequest(_)));
    }

    #[test]
    fn default_locator_substituted_when_absent_or_blank() {
        let req =
            ExtractionRequest::from_body(br#"{"url": "https://site.example/list"}"#, DEFAULT)
                .unwrap();
        assert_eq!(req.locator, DEFAULT);
        assert!(req.locator_defaulted);

        let req = ExtractionRequest::from_body(
            br#"{"url": "https://site.example/list", "locator": ""}"#,
            DEFAULT,
        )
        .unwrap();
        assert_eq!(req.locator, DEFAULT);
    }

    #[test]
    fn legacy_xpath_field_is_accepted() {
        let req = ExtractionRequest::from_body(
            br#"{"url": "https://site.example/list", "xpath": "//ul/li[1]/a"}"#,
            DEFAULT,
        )
        .unwrap();
        assert_eq!(req.locator, "//ul/li[1]/a");
        assert!(!req.locator_defaulted);
        assert_eq!(req.target_url, "https://site.example/list");
    }
}
