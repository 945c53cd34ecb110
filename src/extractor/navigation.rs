//! Navigation and readiness waiting
//!
//! Navigation has a hard ceiling and failing it ends the request. The
//! loading-overlay wait is advisory: the target link is often reachable
//! before the overlay goes away, so every failure mode there is logged and
//! tolerated.

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::page_timeout::with_page_timeout;
use crate::error::{ExtractError, ExtractResult};
use crate::session::PageDriver;

/// Load `url` within `timeout`
///
/// Any failure, including the ceiling, is reported as
/// [`ExtractError::NavigationTimeout`].
pub async fn navigate<P: PageDriver>(page: &P, url: &str, timeout: Duration) -> ExtractResult<()> {
    info!("Navigating to {}", url);
    let started = Instant::now();

    match with_page_timeout(page.goto(url), timeout, "Navigation").await {
        Ok(()) => {
            debug!("Navigation finished after {:?}", started.elapsed());
            Ok(())
        }
        Err(e) => {
            let message = match e {
                ExtractError::NavigationTimeout { message, .. } => message,
                ExtractError::InvalidRequest(m)
                | ExtractError::Environment(m)
                | ExtractError::Browser(m)
                | ExtractError::Internal(m) => m,
            };
            warn!("Navigation to {} failed: {}", url, message);
            Err(ExtractError::NavigationTimeout {
                url: url.to_string(),
                message,
            })
        }
    }
}

/// How the overlay wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayOutcome {
    /// The selector never matched
    Absent,
    /// The overlay was seen and then hidden or removed
    Dismissed,
    /// Still visible, or still being probed, when the ceiling expired
    TimedOut,
    /// The DOM could not be queried
    ProbeFailed,
}

/// Wait for the loading overlay (if any) to become hidden
pub async fn await_overlay_dismissal<P: PageDriver>(
    page: &P,
    selector: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> OverlayOutcome {
    let deadline = Instant::now() + timeout;
    let mut seen = false;

    let outcome = loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match tokio::time::timeout(remaining, page.overlay_visible(selector)).await {
            Err(_) => break OverlayOutcome::TimedOut,
            Ok(Ok(None)) if !seen => break OverlayOutcome::Absent,
            Ok(Ok(None) | Ok(Some(false))) => break OverlayOutcome::Dismissed,
            Ok(Ok(Some(true))) => {
                seen = true;
                let now = Instant::now();
                if now >= deadline {
                    break OverlayOutcome::TimedOut;
                }
                tokio::time::sleep(poll_interval.min(deadline - now)).await;
            }
            Ok(Err(e)) => {
                warn!("Overlay probe for '{}' failed: {}", selector, e);
                break OverlayOutcome::ProbeFailed;
            }
        }
    };

    match outcome {
        OverlayOutcome::Absent => debug!("No loading overlay '{}' on page", selector),
        OverlayOutcome::Dismissed => info!("Loading overlay dismissed"),
        OverlayOutcome::TimedOut => warn!(
            "Loading overlay still visible after {}s, continuing",
            timeout.as_secs()
        ),
        OverlayOutcome::ProbeFailed => warn!("Could not inspect loading overlay, continuing"),
    }
    outcome
}
