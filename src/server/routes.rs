//! Router configuration

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use super::AppState;
use super::handlers;
use crate::session::BrowserLauncher;

/// Build the router, including the legacy `/api/...` aliases
pub fn create_router<L: BrowserLauncher>(state: AppState<L>) -> Router {
    Router::new()
        .route("/extract-video", post(handlers::extract_video::<L>))
        .route("/close-browser", post(handlers::close_browser::<L>))
        .route("/api/get-unboxing-video", post(handlers::extract_video::<L>))
        .route("/api/close-browser", post(handlers::close_browser::<L>))
        .route("/health", get(handlers::health::<L>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
