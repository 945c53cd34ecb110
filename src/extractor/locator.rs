//! Link location, validation and normalization
//!
//! The locator is polled until the first matching element is visible or the
//! ceiling expires. Only an href on the expected video host is accepted; the
//! accepted href gets the autoplay parameter appended.

use regex::Regex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::result::MissReason;
use crate::session::{ElementProbe, PageDriver};
use crate::utils::{append_autoplay, is_valid_url};

/// Result of waiting for the locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// A visible element matched; `href` is its resolved destination, if any
    Visible { href: Option<String> },
    Miss(MissReason),
}

/// Poll `locator` until the first match is visible or `timeout` elapses
pub async fn locate<P: PageDriver>(
    page: &P,
    locator: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> Located {
    info!("Looking up element by locator '{}'", locator);
    let started = Instant::now();
    let deadline = started + timeout;
    let mut last_error: Option<String> = None;

    loop {
        // Each probe only gets the time left before the ceiling
        let remaining = deadline.saturating_duration_since(Instant::now());
        match tokio::time::timeout(remaining, page.probe_element(locator)).await {
            Ok(Ok(ElementProbe::Found {
                visible: true,
                href,
            })) => {
                debug!("Element visible after {:?}", started.elapsed());
                return Located::Visible { href };
            }
            Ok(Ok(ElementProbe::Found { visible: false, .. } | ElementProbe::Missing)) => {
                last_error = None;
            }
            Ok(Ok(ElementProbe::InvalidExpression(msg))) => {
                warn!("Locator '{}' is not a valid expression: {}", locator, msg);
                return Located::Miss(MissReason::InvalidExpression(msg));
            }
            Ok(Err(e)) => {
                debug!("Element probe failed, will retry: {}", e);
                last_error = Some(e.to_string());
            }
            Err(_) => debug!("Element probe still pending at the ceiling, abandoning it"),
        }

        let now = Instant::now();
        if now >= deadline {
            warn!(
                "No visible element for locator '{}' within {}s",
                locator,
                timeout.as_secs()
            );
            return Located::Miss(match last_error {
                Some(msg) => MissReason::ProbeFailed(msg),
                None => MissReason::NotFound,
            });
        }
        tokio::time::sleep(poll_interval.min(deadline - now)).await;
    }
}

/// Check that `href` is an absolute http(s) link on the expected video host
#[must_use]
pub fn is_video_link(href: &str, video_host: &Regex) -> bool {
    is_valid_url(href) && video_host.is_match(href)
}

/// Turn a locator result into either a normalized video link or a miss
pub fn resolve_link(located: Located, video_host: &Regex) -> Result<String, MissReason> {
    let href = match located {
        Located::Visible { href } => href.map(|h| h.trim().to_string()).unwrap_or_default(),
        Located::Miss(reason) => return Err(reason),
    };

    if is_video_link(&href, video_host) {
        let normalized = append_autoplay(&href);
        info!("Recovered video link: {}", normalized);
        Ok(normalized)
    } else {
        warn!("Element href is not a valid video link: '{}'", href);
        Err(MissReason::InvalidHref(href))
    }
}
