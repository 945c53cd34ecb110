//! Video link extraction pipeline
//!
//! `validate -> open page -> attach filter -> navigate -> overlay wait ->
//! locate -> resolve -> release page`. Every request ends in exactly one
//! [`ExtractionOutcome`]; the page is released on every exit path.

pub mod locator;
pub mod navigation;
pub mod page_timeout;
pub mod request;
pub mod resource_filter;
pub mod result;

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::session::{BrowserLauncher, PageDriver, SessionManager};

pub use locator::{Located, is_video_link, locate, resolve_link};
pub use navigation::{OverlayOutcome, await_overlay_dismissal, navigate};
pub use page_timeout::with_page_timeout;
pub use request::{ExtractionRequest, RawExtractionRequest, URL_NOT_ABSOLUTE, URL_REQUIRED};
pub use resource_filter::{ResourceCategory, ResourceFilter};
pub use result::{ExtractionOutcome, ExtractionResult, MissReason};

/// Run one extraction against the shared browser session
pub async fn extract<L: BrowserLauncher>(
    manager: &Arc<SessionManager<L>>,
    config: &ExtractorConfig,
    request: &ExtractionRequest,
) -> ExtractionOutcome {
    let started = Instant::now();

    let lease = match manager.open_page().await {
        Ok(lease) => lease,
        Err(e) => {
            error!("Could not acquire page for {}: {}", request.target_url, e);
            return ExtractionOutcome::Fatal {
                message: e.to_string(),
            };
        }
    };

    let outcome = drive_page(lease.page(), config, request).await;
    lease.release().await;

    info!(
        "Extraction for {} finished as {} in {:?}",
        request.target_url,
        outcome.label(),
        started.elapsed()
    );
    outcome
}

async fn drive_page<P: PageDriver>(
    page: &P,
    config: &ExtractorConfig,
    request: &ExtractionRequest,
) -> ExtractionOutcome {
    let filter = ResourceFilter::new(config.blocked_resources().iter().copied());
    if let Err(e) = page.install_resource_filter(&filter).await {
        error!("Failed to attach resource filter: {}", e);
        return ExtractionOutcome::Fatal {
            message: e.to_string(),
        };
    }

    if let Err(e) = navigate(page, &request.target_url, config.navigation_timeout()).await {
        let message = match e {
            ExtractError::NavigationTimeout { message, .. } => message,
            other => other.to_string(),
        };
        return ExtractionOutcome::NavigationFailure {
            requested_url: request.target_url.clone(),
            message,
        };
    }

    await_overlay_dismissal(
        page,
        config.overlay_selector(),
        config.overlay_timeout(),
        config.poll_interval(),
    )
    .await;

    let located = locate(
        page,
        &request.locator,
        config.locator_timeout(),
        config.poll_interval(),
    )
    .await;

    match resolve_link(located, config.video_host_regex()) {
        Ok(video_url) => ExtractionOutcome::Success { video_url },
        Err(reason) => {
            info!("No video link on {}: {}", request.target_url, reason);
            ExtractionOutcome::LocatorMiss {
                requested_url: request.target_url.clone(),
                reason,
            }
        }
    }
}

/// Run [`extract`] on its own task so a panic becomes a `Fatal` outcome
pub async fn spawn_extraction<L: BrowserLauncher>(
    manager: Arc<SessionManager<L>>,
    config: Arc<ExtractorConfig>,
    request: ExtractionRequest,
) -> ExtractionOutcome {
    let task = tokio::spawn(async move { extract(&manager, &config, &request).await });

    match task.await {
        Ok(outcome) => outcome,
        Err(e) if e.is_panic() => {
            error!("Extraction task panicked");
            ExtractionOutcome::Fatal {
                message: ExtractError::Internal("extraction task panicked".into()).to_string(),
            }
        }
        Err(e) => {
            warn!("Extraction task did not complete: {}", e);
            ExtractionOutcome::Fatal {
                message: ExtractError::Internal(e.to_string()).to_string(),
            }
        }
    }
}
