//! CDP-backed page driver
//!
//! Resource blocking uses the Fetch domain: every request pauses, and a
//! background task either fails it with `BlockedByClient` or lets it
//! continue. Locator and overlay probes are single `Runtime.evaluate` calls
//! returning plain JSON values.

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams, EventRequestPaused, FailRequestParams, RequestPattern,
    RequestStage,
};
use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, ResourceType};
use futures::StreamExt;
use serde::Deserialize;
use std::sync::Mutex as StdMutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::error::{ExtractError, ExtractResult};
use crate::extractor::{ResourceCategory, ResourceFilter};
use crate::session::{ElementProbe, PageDriver};

const READY_STATE_POLL: Duration = Duration::from_millis(100);

pub struct ChromiumPage {
    page: Page,
    interceptor: StdMutex<Option<JoinHandle<()>>>,
}

impl ChromiumPage {
    pub(crate) fn new(page: Page) -> Self {
        Self {
            page,
            interceptor: StdMutex::new(None),
        }
    }

    fn set_interceptor(&self, task: JoinHandle<()>) {
        let mut guard = match self.interceptor.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = guard.replace(task) {
            previous.abort();
        }
    }

    fn stop_interceptor(&self) {
        let task = match self.interceptor.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(task) = task {
            task.abort();
        }
    }
}

/// Map a CDP resource type onto the categories the filter understands
#[must_use]
pub fn categorize(resource_type: &ResourceType) -> ResourceCategory {
    match resource_type {
        ResourceType::Document => ResourceCategory::Document,
        ResourceType::Stylesheet => ResourceCategory::Stylesheet,
        ResourceType::Image => ResourceCategory::Image,
        ResourceType::Media => ResourceCategory::Media,
        ResourceType::Font => ResourceCategory::Font,
        ResourceType::Script => ResourceCategory::Script,
        ResourceType::Xhr => ResourceCategory::Xhr,
        ResourceType::Fetch => ResourceCategory::Fetch,
        _ => ResourceCategory::Other,
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
enum ProbeReport {
    Missing,
    Invalid { message: String },
    Found { visible: bool, href: Option<String> },
}

impl From<ProbeReport> for ElementProbe {
    fn from(report: ProbeReport) -> Self {
        match report {
            ProbeReport::Missing => Self::Missing,
            ProbeReport::Invalid { message } => Self::InvalidExpression(message),
            ProbeReport::Found { visible, href } => Self::Found { visible, href },
        }
    }
}

fn js_string(value: &str) -> ExtractResult<String> {
    serde_json::to_string(value).map_err(|e| ExtractError::Internal(e.to_string()))
}

/// Visible: not `visibility: hidden` and a non-empty bounding box
const IS_VISIBLE_FN: &str = r"
    const isVisible = (el) => {
        const style = window.getComputedStyle(el);
        const rect = el.getBoundingClientRect();
        return !!style && style.visibility !== 'hidden'
            && !!(rect.top || rect.bottom || rect.width || rect.height);
    };";

fn overlay_script(selector: &str) -> ExtractResult<String> {
    Ok(format!(
        r"(() => {{
    {IS_VISIBLE_FN}
    const el = document.querySelector({selector});
    return el ? isVisible(el) : null;
}})()",
        selector = js_string(selector)?
    ))
}

fn probe_script(locator: &str) -> ExtractResult<String> {
    Ok(format!(
        r"(() => {{
    {IS_VISIBLE_FN}
    let node;
    try {{
        node = document.evaluate({locator}, document, null,
            XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;
    }} catch (e) {{
        return {{ state: 'invalid', message: String((e && e.message) || e) }};
    }}
    if (!node) return {{ state: 'missing' }};
    const el = node.nodeType === Node.ELEMENT_NODE ? node : node.parentElement;
    if (!el) return {{ state: 'found', visible: false, href: null }};
    let href = null;
    if (typeof el.href === 'string') {{
        href = el.href;
    }} else if (el.hasAttribute('href')) {{
        try {{ href = new URL(el.getAttribute('href'), document.baseURI).href; }}
        catch (_) {{ href = el.getAttribute('href'); }}
    }}
    return {{ state: 'found', visible: isVisible(el), href }};
}})()",
        locator = js_string(locator)?
    ))
}

#[async_trait]
impl PageDriver for ChromiumPage {
    async fn install_resource_filter(&self, filter: &ResourceFilter) -> ExtractResult<()> {
        if filter.is_empty() {
            debug!("Resource filter empty, request interception disabled");
            return Ok(());
        }

        let mut paused = self
            .page
            .event_listener::<EventRequestPaused>()
            .await
            .context("Failed to subscribe to paused requests")?;

        self.page
            .execute(EnableParams {
                patterns: Some(vec![RequestPattern {
                    url_pattern: Some("*".to_string()),
                    resource_type: None,
                    request_stage: Some(RequestStage::Request),
                }]),
                handle_auth_requests: None,
            })
            .await
            .context("Failed to enable request interception")?;

        debug!("Blocking resource categories: {:?}", filter.blocked());
        let page = self.page.clone();
        let filter = filter.clone();
        let task = tokio::spawn(async move {
            while let Some(event) = paused.next().await {
                let category = categorize(&event.resource_type);
                let result = if filter.should_abort(category) {
                    trace!("Blocking {} request {}", category, event.request.url);
                    page.execute(FailRequestParams::new(
                        event.request_id.clone(),
                        ErrorReason::BlockedByClient,
                    ))
                    .await
                    .map(|_| ())
                } else {
                    page.execute(ContinueRequestParams::new(event.request_id.clone()))
                        .await
                        .map(|_| ())
                };
                if let Err(e) = result {
                    debug!("Failed to resolve paused request: {}", e);
                }
            }
            trace!("Request interception stream ended");
        });
        self.set_interceptor(task);
        Ok(())
    }

    async fn goto(&self, url: &str) -> ExtractResult<()> {
        self.page
            .goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {url}"))?;

        // goto returns on the main response; subresources may still be loading
        loop {
            let state: String = self
                .page
                .evaluate("document.readyState")
                .await
                .context("Failed to read document.readyState")?
                .into_value()
                .context("document.readyState was not a string")?;
            if state == "complete" {
                return Ok(());
            }
            tokio::time::sleep(READY_STATE_POLL).await;
        }
    }

    async fn overlay_visible(&self, selector: &str) -> ExtractResult<Option<bool>> {
        let visible = self
            .page
            .evaluate(overlay_script(selector)?)
            .await
            .context("Overlay probe failed")?
            .into_value::<Option<bool>>()
            .context("Overlay probe returned an unexpected value")?;
        Ok(visible)
    }

    async fn probe_element(&self, locator: &str) -> ExtractResult<ElementProbe> {
        let report = self
            .page
            .evaluate(probe_script(locator)?)
            .await
            .context("Locator probe failed")?
            .into_value::<ProbeReport>()
            .map_err(|e| anyhow!("Locator probe returned an unexpected value: {e}"))?;
        Ok(report.into())
    }

    async fn close(&self) -> ExtractResult<()> {
        self.stop_interceptor();
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| ExtractError::Browser(e.to_string()))
    }
}
