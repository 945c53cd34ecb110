//! In-memory browser backend for the extractor test suite
//!
//! `FakeLauncher` hands out sessions and pages that follow a shared, mutable
//! script and record every call, so tests can assert on both outcomes and
//! cleanup.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use video_link_extractor::{
    BrowserLauncher, BrowserSession, ElementProbe, ExtractError, ExtractResult, ExtractorConfig,
    PageDriver, ResourceFilter,
};

pub const VIDEO_HOST_PATTERN: &str = r"^https?://videohost\.example/v/";
pub const FALLBACK_URL: &str = "https://videohost.example/playlist?no=1";
pub const DEFAULT_LOCATOR: &str = "//ul[@id='playlist']/li[1]/a";
pub const TARGET_URL: &str = "https://listing.example/new-arrivals";

/// How the locator probe behaves
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum ElementScript {
    /// Never matches
    Never,
    /// Missing for `after` probes, then visible with `href`
    Visible { href: Option<String>, after: usize },
    /// Matches but is never visible
    Hidden,
    Invalid(String),
    ProbeError(String),
    /// The evaluate call never returns
    Hang,
    Panic,
}

/// How the overlay probe behaves
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)]
pub enum OverlayScript {
    Absent,
    /// Visible for `polls` probes, then hidden
    VisibleFor { polls: usize },
    Stuck,
    ProbeError,
    Hang,
}

#[derive(Debug)]
pub struct FakeState {
    pub launch_error: Option<String>,
    pub nav_error: Option<String>,
    pub nav_hang: bool,
    pub filter_error: bool,
    pub page_close_error: bool,
    pub element: ElementScript,
    pub overlay: OverlayScript,

    pub launches: usize,
    pub dead: HashSet<usize>,
    pub sessions_closed: Vec<usize>,
    pub pages_opened: usize,
    pub pages_closed: usize,
    pub probe_calls: usize,
    pub overlay_calls: usize,
    pub locators: Vec<String>,
    pub filters: Vec<ResourceFilter>,
    pub visited: Vec<String>,
    /// "filter" / "goto" / "overlay" / "probe" / "close", in call order
    pub calls: Vec<&'static str>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            launch_error: None,
            nav_error: None,
            nav_hang: false,
            filter_error: false,
            page_close_error: false,
            element: ElementScript::Visible {
                href: Some("https://videohost.example/v/12345".to_string()),
                after: 0,
            },
            overlay: OverlayScript::Absent,
            launches: 0,
            dead: HashSet::new(),
            sessions_closed: Vec::new(),
            pages_opened: 0,
            pages_closed: 0,
            probe_calls: 0,
            overlay_calls: 0,
            locators: Vec::new(),
            filters: Vec::new(),
            visited: Vec::new(),
            calls: Vec::new(),
        }
    }
}

type Shared = Arc<Mutex<FakeState>>;

fn lock(state: &Shared) -> MutexGuard<'_, FakeState> {
    state.lock().unwrap()
}

#[derive(Clone, Default)]
pub struct FakeLauncher {
    state: Shared,
}

#[allow(dead_code)]
impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect or rescript the backend
    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        lock(&self.state)
    }

    pub fn with_element(self, element: ElementScript) -> Self {
        self.state().element = element;
        self
    }

    pub fn with_href(self, href: &str) -> Self {
        self.with_element(ElementScript::Visible {
            href: Some(href.to_string()),
            after: 0,
        })
    }

    pub fn with_overlay(self, overlay: OverlayScript) -> Self {
        self.state().overlay = overlay;
        self
    }

    pub fn failing_launch(self, message: &str) -> Self {
        self.state().launch_error = Some(message.to_string());
        self
    }

    /// Make the most recently launched browser fail its health check
    pub fn kill_current_browser(&self) {
        let mut state = self.state();
        let current = state.launches;
        state.dead.insert(current);
    }
}

pub struct FakeSession {
    generation: usize,
    state: Shared,
}

pub struct FakePage {
    state: Shared,
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    type Session = FakeSession;

    async fn launch(&self) -> ExtractResult<FakeSession> {
        let mut state = lock(&self.state);
        if let Some(message) = state.launch_error.clone() {
            return Err(ExtractError::Environment(message));
        }
        state.launches += 1;
        Ok(FakeSession {
            generation: state.launches,
            state: Arc::clone(&self.state),
        })
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    type Page = FakePage;

    async fn is_alive(&self) -> bool {
        !lock(&self.state).dead.contains(&self.generation)
    }

    async fn new_page(&self) -> ExtractResult<FakePage> {
        lock(&self.state).pages_opened += 1;
        Ok(FakePage {
            state: Arc::clone(&self.state),
        })
    }

    async fn close(&self) -> ExtractResult<()> {
        lock(&self.state).sessions_closed.push(self.generation);
        Ok(())
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn install_resource_filter(&self, filter: &ResourceFilter) -> ExtractResult<()> {
        let mut state = lock(&self.state);
        state.calls.push("filter");
        if state.filter_error {
            return Err(ExtractError::Browser("Fetch.enable failed".to_string()));
        }
        state.filters.push(filter.clone());
        Ok(())
    }

    async fn goto(&self, url: &str) -> ExtractResult<()> {
        let hang = {
            let mut state = lock(&self.state);
            state.calls.push("goto");
            state.visited.push(url.to_string());
            if let Some(message) = state.nav_error.clone() {
                return Err(ExtractError::Browser(message));
            }
            state.nav_hang
        };
        if hang {
            futures::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn overlay_visible(&self, _selector: &str) -> ExtractResult<Option<bool>> {
        let hang = {
            let mut state = lock(&self.state);
            state.calls.push("overlay");
            state.overlay_calls += 1;
            matches!(state.overlay, OverlayScript::Hang)
        };
        if hang {
            return futures::future::pending().await;
        }

        let state = lock(&self.state);
        match state.overlay {
            OverlayScript::Absent => Ok(None),
            OverlayScript::VisibleFor { polls } => Ok(Some(state.overlay_calls <= polls)),
            OverlayScript::Stuck => Ok(Some(true)),
            OverlayScript::ProbeError => {
                Err(ExtractError::Browser("Runtime.evaluate failed".to_string()))
            }
            OverlayScript::Hang => unreachable!(),
        }
    }

    async fn probe_element(&self, locator: &str) -> ExtractResult<ElementProbe> {
        let hang = {
            let mut state = lock(&self.state);
            state.calls.push("probe");
            state.probe_calls += 1;
            state.locators.push(locator.to_string());
            matches!(state.element, ElementScript::Hang)
        };
        if hang {
            return futures::future::pending().await;
        }

        let state = lock(&self.state);
        match state.element.clone() {
            ElementScript::Never => Ok(ElementProbe::Missing),
            ElementScript::Visible { href, after } => {
                if state.probe_calls > after {
                    Ok(ElementProbe::Found {
                        visible: true,
                        href,
                    })
                } else {
                    Ok(ElementProbe::Missing)
                }
            }
            ElementScript::Hidden => Ok(ElementProbe::Found {
                visible: false,
                href: Some("https://videohost.example/v/hidden".to_string()),
            }),
            ElementScript::Invalid(message) => Ok(ElementProbe::InvalidExpression(message)),
            ElementScript::ProbeError(message) => Err(ExtractError::Browser(message)),
            ElementScript::Hang => unreachable!(),
            ElementScript::Panic => {
                drop(state);
                panic!("probe exploded");
            }
        }
    }

    async fn close(&self) -> ExtractResult<()> {
        let mut state = lock(&self.state);
        state.calls.push("close");
        state.pages_closed += 1;
        if state.page_close_error {
            return Err(ExtractError::Browser("Target.closeTarget failed".to_string()));
        }
        Ok(())
    }
}

/// Config pointing at the fake video host
#[allow(dead_code)]
pub fn test_config() -> ExtractorConfig {
    ExtractorConfig::builder()
        .video_host_pattern(VIDEO_HOST_PATTERN)
        .fallback_url(FALLBACK_URL)
        .default_locator(DEFAULT_LOCATOR)
        .build()
        .unwrap()
}

/// Let spawned cleanup tasks run
#[allow(dead_code)]
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
