//! Request handlers

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use super::AppState;
use super::types::{CloseResponse, ErrorResponse, ExtractionResponse, HealthResponse};
use crate::extractor::{ExtractionOutcome, ExtractionRequest, spawn_extraction};
use crate::session::{BrowserLauncher, CloseOutcome};

/// `POST /extract-video`
pub async fn extract_video<L: BrowserLauncher>(
    State(state): State<AppState<L>>,
    body: Bytes,
) -> Response {
    let request = match ExtractionRequest::from_body(&body, state.config.default_locator()) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected extraction request: {}", e);
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
            return (status, Json(ErrorResponse::new(e.to_string()))).into_response();
        }
    };

    info!(
        "Extraction requested for {} (default locator: {})",
        request.target_url, request.locator_defaulted
    );

    let outcome = spawn_extraction(state.manager.clone(), state.config.clone(), request).await;

    let status = match &outcome {
        ExtractionOutcome::Fatal { message } => {
            error!("Extraction failed: {}", message);
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::OK,
    };

    let result = outcome.into_result(state.config.fallback_url());
    (status, Json(ExtractionResponse::from(result))).into_response()
}

/// `POST /close-browser`
pub async fn close_browser<L: BrowserLauncher>(State(state): State<AppState<L>>) -> Response {
    let message = match state.manager.close_session().await {
        CloseOutcome::Closed => "Browser closed.".to_string(),
        CloseOutcome::AlreadyAbsent => "Browser was not running.".to_string(),
        CloseOutcome::Deferred { open_pages } => format!(
            "Browser will close after {open_pages} in-flight request(s) finish."
        ),
    };
    info!("Close requested: {}", message);

    Json(CloseResponse {
        success: true,
        message,
    })
    .into_response()
}

/// `GET /health`
pub async fn health<L: BrowserLauncher>(State(state): State<AppState<L>>) -> Response {
    Json(HealthResponse {
        status: "ok",
        session: state.manager.phase().await,
        open_pages: state.manager.open_pages().await,
    })
    .into_response()
}
