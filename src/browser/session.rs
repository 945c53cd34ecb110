//! Running Chromium process shared by all requests

use anyhow::Context;
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use std::sync::Mutex as StdMutex;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::page::ChromiumPage;
use super::profile::BrowserProfile;
use crate::error::ExtractResult;
use crate::session::BrowserSession;

/// Browser, its CDP handler task, and its profile directory
///
/// The handler is aborted on drop. The profile directory is removed after an
/// explicit [`close`](BrowserSession::close), or on drop as a fallback.
pub struct ChromiumSession {
    browser: RwLock<Browser>,
    handler: JoinHandle<()>,
    profile: StdMutex<Option<BrowserProfile>>,
}

impl ChromiumSession {
    pub(crate) fn new(browser: Browser, handler: JoinHandle<()>, profile: BrowserProfile) -> Self {
        Self {
            browser: RwLock::new(browser),
            handler,
            profile: StdMutex::new(Some(profile)),
        }
    }

    fn take_profile(&self) -> Option<BrowserProfile> {
        match self.profile.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    type Page = ChromiumPage;

    async fn is_alive(&self) -> bool {
        match self.browser.read().await.version().await {
            Ok(version) => {
                debug!("Browser alive: {}", version.product);
                true
            }
            Err(e) => {
                warn!("Browser version probe failed: {}", e);
                false
            }
        }
    }

    async fn new_page(&self) -> ExtractResult<ChromiumPage> {
        let page = self
            .browser
            .read()
            .await
            .new_page("about:blank")
            .await
            .context("Failed to create blank page")?;
        Ok(ChromiumPage::new(page))
    }

    async fn close(&self) -> ExtractResult<()> {
        let mut browser = self.browser.write().await;

        let closed = browser.close().await.context("Failed to close browser");
        if let Err(e) = browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();

        // Profile removal must follow process exit
        drop(self.take_profile());
        info!("Browser process closed");

        closed.map(|_| ()).map_err(Into::into)
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler.abort();
        if self.take_profile().is_some() {
            warn!("ChromiumSession dropped without close, profile removed in Drop");
        }
    }
}
