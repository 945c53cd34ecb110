//! Browser backend seams
//!
//! The session manager and the extraction pipeline only talk to a browser
//! through these traits. [`crate::browser`] implements them over
//! chromiumoxide; tests implement them with in-memory fakes.

use async_trait::async_trait;

use crate::error::ExtractResult;
use crate::extractor::ResourceFilter;

/// Launches browser processes. Called at most once per session lifetime.
#[async_trait]
pub trait BrowserLauncher: Send + Sync + 'static {
    type Session: BrowserSession;

    /// Launch a fresh browser. Failures are reported as
    /// [`ExtractError::Environment`](crate::error::ExtractError::Environment).
    async fn launch(&self) -> ExtractResult<Self::Session>;
}

/// A running browser process shared by all requests
#[async_trait]
pub trait BrowserSession: Send + Sync + 'static {
    type Page: PageDriver;

    /// Cheap liveness probe used before reusing a stored session
    async fn is_alive(&self) -> bool;

    /// Open a new blank page (tab)
    async fn new_page(&self) -> ExtractResult<Self::Page>;

    /// Close the browser process and release its resources
    async fn close(&self) -> ExtractResult<()>;
}

/// One observation of the target locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementProbe {
    /// No node matches the expression
    Missing,
    /// First node in document order, its visibility, and its resolved href
    Found {
        visible: bool,
        href: Option<String>,
    },
    /// The expression itself could not be evaluated
    InvalidExpression(String),
}

/// A single page driven by the extraction pipeline
///
/// Methods are single-shot; polling and ceilings live in
/// [`crate::extractor`] so every backend gets identical timing behaviour.
#[async_trait]
pub trait PageDriver: Send + Sync + 'static {
    /// Register the abort predicate for outgoing sub-resource requests
    async fn install_resource_filter(&self, filter: &ResourceFilter) -> ExtractResult<()>;

    /// Navigate and wait until the document has loaded
    async fn goto(&self, url: &str) -> ExtractResult<()>;

    /// `None` when no element matches `selector`, otherwise its visibility
    async fn overlay_visible(&self, selector: &str) -> ExtractResult<Option<bool>>;

    /// Evaluate the locator expression once
    async fn probe_element(&self, locator: &str) -> ExtractResult<ElementProbe>;

    async fn close(&self) -> ExtractResult<()>;
}

/// Page type produced by a launcher's sessions
pub type PageOf<L> = <<L as BrowserLauncher>::Session as BrowserSession>::Page;
