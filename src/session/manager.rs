//! Shared browser session lifecycle
//!
//! One browser process serves every request. It is launched on the first
//! page request and reused until an explicit close or process shutdown.
//!
//! # Lifecycle
//! `Absent -> Launching -> Ready -> Closing -> Absent`
//!
//! All transitions happen under a single async mutex, so there is exactly one
//! writer at a time. Open pages are reference counted: `close_session()` while
//! pages are open only marks the session for closing, and the last page
//! release performs the actual close.
//!
//! Each launch is a new generation. A browser that fails its health check
//! while other requests still hold pages on it is retired rather than closed:
//! the replacement serves new pages and the retired browser closes once its
//! own pages are released.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::backend::{BrowserLauncher, BrowserSession, PageDriver, PageOf};
use super::lease::PageLease;
use crate::error::{ExtractError, ExtractResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Absent,
    Launching,
    Ready,
    Closing,
}

/// What `close_session()` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// No browser was running
    AlreadyAbsent,
    /// The browser was closed immediately
    Closed,
    /// Pages are still open; the browser closes when the last one is released
    Deferred { open_pages: usize },
}

/// An unhealthy browser that still has pages open
struct Retired<S> {
    generation: u64,
    session: Arc<S>,
    open_pages: usize,
}

struct SessionState<S> {
    session: Option<Arc<S>>,
    phase: SessionPhase,
    /// Pages open on the current generation
    open_pages: usize,
    close_pending: bool,
    /// Generation of `session`; equals the number of successful launches
    launches: u64,
    retired: Vec<Retired<S>>,
}

pub struct SessionManager<L: BrowserLauncher> {
    launcher: L,
    state: Mutex<SessionState<L::Session>>,
}

impl<L: BrowserLauncher> SessionManager<L> {
    /// Create a manager. The browser is NOT launched until the first page is opened.
    #[must_use]
    pub fn new(launcher: L) -> Arc<Self> {
        Arc::new(Self {
            launcher,
            state: Mutex::new(SessionState {
                session: None,
                phase: SessionPhase::Absent,
                open_pages: 0,
                close_pending: false,
                launches: 0,
                retired: Vec::new(),
            }),
        })
    }

    /// Open a page on the shared session, launching the browser if needed.
    ///
    /// The returned lease must be released with [`PageLease::release`]; if it
    /// is dropped instead, release is scheduled on the runtime.
    pub async fn open_page(self: &Arc<Self>) -> ExtractResult<PageLease<L>> {
        let (session, generation) = {
            let mut state = self.state.lock().await;
            let session = self.ensure_session(&mut state).await?;
            state.open_pages += 1;
            debug!("Opening page ({} open)", state.open_pages);
            (session, state.launches)
        };

        match session.new_page().await {
            Ok(page) => Ok(PageLease::new(page, generation, Arc::clone(self))),
            Err(e) => {
                warn!("Failed to open page: {}", e);
                self.release_slot(generation).await;
                Err(e)
            }
        }
    }

    /// Return the stored session, launching or relaunching as needed.
    /// Launch failure leaves the state `Absent`.
    async fn ensure_session(
        &self,
        state: &mut SessionState<L::Session>,
    ) -> ExtractResult<Arc<L::Session>> {
        if let Some(session) = state.session.as_ref() {
            if session.is_alive().await {
                debug!("Browser health check passed, reusing existing browser");
                return Ok(Arc::clone(session));
            }

            warn!("Browser health check failed, relaunching");
            if let Some(dead) = state.session.take() {
                if state.open_pages == 0 {
                    // Best-effort cleanup (may fail if process already dead)
                    if let Err(e) = dead.close().await {
                        debug!("Closing dead browser failed: {}", e);
                    }
                } else {
                    info!(
                        "Retiring browser #{} until its {} open page(s) are released",
                        state.launches, state.open_pages
                    );
                    state.retired.push(Retired {
                        generation: state.launches,
                        session: dead,
                        open_pages: state.open_pages,
                    });
                    state.open_pages = 0;
                }
            }
            state.phase = SessionPhase::Absent;
        }

        info!("Launching shared browser session");
        state.phase = SessionPhase::Launching;
        match self.launcher.launch().await {
            Ok(session) => {
                let session = Arc::new(session);
                state.session = Some(Arc::clone(&session));
                state.phase = if state.close_pending {
                    SessionPhase::Closing
                } else {
                    SessionPhase::Ready
                };
                state.launches += 1;
                info!("Browser session ready (launch #{})", state.launches);
                Ok(session)
            }
            Err(e) => {
                state.phase = SessionPhase::Absent;
                let err = match e {
                    ExtractError::Environment(_) => e,
                    other => ExtractError::Environment(other.to_string()),
                };
                warn!("Browser launch failed: {}", err);
                Err(err)
            }
        }
    }

    /// Close one page and drop its slot from the open-page count.
    /// Close failures are logged and swallowed.
    pub(crate) async fn finish_page(&self, page: PageOf<L>, generation: u64) {
        if let Err(e) = page.close().await {
            warn!("Failed to close page: {}", e);
        } else {
            debug!("Page closed");
        }
        self.release_slot(generation).await;
    }

    async fn release_slot(&self, generation: u64) {
        let mut state = self.state.lock().await;

        if let Some(index) = state.retired.iter().position(|r| r.generation == generation) {
            let retired = &mut state.retired[index];
            retired.open_pages = retired.open_pages.saturating_sub(1);
            if retired.open_pages == 0 {
                let retired = state.retired.swap_remove(index);
                info!("Closing retired browser #{}", retired.generation);
                if let Err(e) = retired.session.close().await {
                    debug!("Closing retired browser failed: {}", e);
                }
            }
            return;
        }

        if generation != state.launches {
            debug!("Page from closed browser #{} released", generation);
            return;
        }

        state.open_pages = state.open_pages.saturating_sub(1);
        if state.open_pages == 0 && state.close_pending {
            info!("Last page released, running deferred browser close");
            Self::close_locked(&mut state).await;
        }
    }

    /// Close the shared browser, deferring while pages are open.
    /// Calling it with no browser running is a no-op.
    pub async fn close_session(&self) -> CloseOutcome {
        let mut state = self.state.lock().await;

        if state.session.is_none() {
            debug!("close_session: no browser running");
            state.close_pending = false;
            return CloseOutcome::AlreadyAbsent;
        }

        if state.open_pages > 0 {
            info!(
                "Deferring browser close until {} open page(s) are released",
                state.open_pages
            );
            state.close_pending = true;
            state.phase = SessionPhase::Closing;
            return CloseOutcome::Deferred {
                open_pages: state.open_pages,
            };
        }

        Self::close_locked(&mut state).await;
        CloseOutcome::Closed
    }

    /// Close the browser regardless of open pages. Used at process exit, after
    /// the HTTP server has drained in-flight requests.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        if state.open_pages > 0 {
            warn!(
                "Shutting down browser with {} page(s) still open",
                state.open_pages
            );
        }
        Self::close_locked(&mut state).await;
        for retired in std::mem::take(&mut state.retired) {
            if let Err(e) = retired.session.close().await {
                debug!("Closing retired browser #{} failed: {}", retired.generation, e);
            }
        }
    }

    async fn close_locked(state: &mut SessionState<L::Session>) {
        state.close_pending = false;
        state.open_pages = 0;
        if let Some(session) = state.session.take() {
            state.phase = SessionPhase::Closing;
            info!("Closing shared browser session");
            if let Err(e) = session.close().await {
                warn!("Failed to close browser cleanly: {}", e);
            }
        }
        state.phase = SessionPhase::Absent;
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.lock().await.phase
    }

    /// Pages currently open, including those on retired browsers
    pub async fn open_pages(&self) -> usize {
        let state = self.state.lock().await;
        state.open_pages + state.retired.iter().map(|r| r.open_pages).sum::<usize>()
    }

    /// Number of successful browser launches since creation
    pub async fn launch_count(&self) -> u64 {
        self.state.lock().await.launches
    }
}
