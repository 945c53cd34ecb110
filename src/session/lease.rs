//! Release-on-exit handle for a request's page

use std::sync::Arc;
use tracing::{debug, warn};

use super::backend::{BrowserLauncher, PageOf};
use super::manager::SessionManager;

/// RAII guard for one open page
///
/// `release()` closes the page and returns its slot to the manager. If the
/// guard is dropped without being released (task cancelled or panicked),
/// `Drop` spawns the same release on the current runtime. Either way the page
/// is closed exactly once.
pub struct PageLease<L: BrowserLauncher> {
    page: Option<PageOf<L>>,
    /// Browser generation the page was opened on
    generation: u64,
    manager: Arc<SessionManager<L>>,
}

impl<L: BrowserLauncher> PageLease<L> {
    pub(crate) fn new(page: PageOf<L>, generation: u64, manager: Arc<SessionManager<L>>) -> Self {
        Self {
            page: Some(page),
            generation,
            manager,
        }
    }

    /// Get reference to the underlying page
    pub fn page(&self) -> &PageOf<L> {
        self.page
            .as_ref()
            .expect("page is present until the lease is released")
    }

    /// Close the page and return its slot to the manager
    pub async fn release(mut self) {
        if let Some(page) = self.page.take() {
            self.manager.finish_page(page, self.generation).await;
        }
    }
}

impl<L: BrowserLauncher> Drop for PageLease<L> {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };

        debug!("PageLease dropped without release, scheduling page close");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let manager = Arc::clone(&self.manager);
                let generation = self.generation;
                handle.spawn(async move {
                    manager.finish_page(page, generation).await;
                });
            }
            Err(_) => warn!("No async runtime available to close dropped page"),
        }
    }
}
