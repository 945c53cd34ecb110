//! Chromium backend for the session traits
//!
//! [`ChromiumLauncher`] finds a local Chrome/Chromium binary, gives each
//! launch a fresh profile directory, and wraps the running process in a
//! [`ChromiumSession`].

mod page;
mod profile;
mod session;
mod setup;

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use crate::config::ExtractorConfig;
use crate::error::{ExtractError, ExtractResult};
use crate::session::BrowserLauncher;
use crate::utils::constants::PROFILE_DIR_PREFIX;

pub use page::{ChromiumPage, categorize};
pub use profile::{BrowserProfile, create_unique_profile};
pub use session::ChromiumSession;
pub use setup::{find_browser_executable, launch_browser};

#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    headless: bool,
    executable: Option<PathBuf>,
}

impl ChromiumLauncher {
    #[must_use]
    pub fn new(headless: bool, executable: Option<PathBuf>) -> Self {
        Self {
            headless,
            executable,
        }
    }

    #[must_use]
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(
            config.headless(),
            config.chrome_executable().map(PathBuf::from),
        )
    }

    async fn try_launch(&self) -> anyhow::Result<ChromiumSession> {
        let executable = find_browser_executable(self.executable.as_deref()).await?;
        let profile = create_unique_profile(PROFILE_DIR_PREFIX)?;
        let (browser, handler) = launch_browser(executable, self.headless, profile.path()).await?;
        info!("Browser launched with profile {}", profile.path().display());
        Ok(ChromiumSession::new(browser, handler, profile))
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn launch(&self) -> ExtractResult<ChromiumSession> {
        self.try_launch()
            .await
            .map_err(|e| ExtractError::Environment(format!("{e:#}")))
    }
}
