//! Wire types for the HTTP API

use serde::Serialize;

use crate::extractor::ExtractionResult;
use crate::session::SessionPhase;

/// Body of every extraction response (200 and 500)
///
/// `video_url` mirrors `url` for older clients.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResponse {
    pub success: bool,
    pub url: String,
    pub video_url: String,
    pub autoplay: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ExtractionResult> for ExtractionResponse {
    fn from(result: ExtractionResult) -> Self {
        Self {
            success: result.succeeded,
            url: result.video_url.clone(),
            video_url: result.video_url,
            autoplay: result.autoplay_eligible,
            error: result.error_message,
        }
    }
}

/// 400 body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CloseResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub session: SessionPhase,
    pub open_pages: usize,
}
