use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};

use crate::utils::constants::{CDP_REQUEST_TIMEOUT_SECS, CHROME_USER_AGENT};

/// Find a Chrome/Chromium executable.
///
/// An explicitly configured path wins; then well-known install locations for
/// the platform; then `which` on Unix. There is no download fallback.
pub async fn find_browser_executable(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            info!("Using configured browser: {}", path.display());
            return Ok(path.to_path_buf());
        }
        warn!(
            "Configured browser path does not exist: {}, searching system locations",
            path.display()
        );
    }

    let candidates: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "~/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    };

    for candidate in candidates {
        let path = match candidate.strip_prefix("~/") {
            Some(rest) => match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => continue,
            },
            None => PathBuf::from(candidate),
        };

        if path.exists() {
            info!("Found browser at: {}", path.display());
            return Ok(path);
        }
    }

    if !cfg!(target_os = "windows") {
        for cmd in ["chromium", "chromium-browser", "google-chrome", "chrome"] {
            if let Ok(output) = Command::new("which").arg(cmd).output()
                && output.status.success()
            {
                let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !found.is_empty() {
                    info!("Found browser using 'which': {}", found);
                    return Ok(PathBuf::from(found));
                }
            }
        }
    }

    Err(anyhow::anyhow!(
        "Chrome/Chromium executable not found; install it or set CHROMIUM_PATH"
    ))
}

/// Launch Chrome with the given executable and profile directory.
///
/// The returned `JoinHandle` drives the CDP connection and MUST be aborted
/// once the browser is closed.
pub async fn launch_browser(
    executable: PathBuf,
    headless: bool,
    user_data_dir: &Path,
) -> Result<(Browser, JoinHandle<()>)> {
    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_secs(CDP_REQUEST_TIMEOUT_SECS))
        .window_size(1366, 900)
        .user_data_dir(user_data_dir)
        .chrome_executable(executable);

    builder = if headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    let config = builder
        .arg(format!("--user-agent={CHROME_USER_AGENT}"))
        .arg("--no-sandbox")
        .arg("--disable-setuid-sandbox")
        .arg("--disable-gpu")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-blink-features=AutomationControlled")
        .arg("--disable-extensions")
        .arg("--disable-notifications")
        .arg("--disable-background-networking")
        .arg("--disable-breakpad")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--mute-audio")
        .arg("--hide-scrollbars")
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

    debug!("Launching browser with config: {:?}", config);
    let (browser, mut handler) = Browser::launch(config)
        .await
        .context("Failed to launch browser")?;

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                let message = e.to_string();
                // Chrome emits CDP events chromiumoxide has no type for
                if is_benign_cdp_error(&message) {
                    trace!("Suppressed benign CDP serialization error: {}", message);
                } else {
                    error!("Browser handler error: {:?}", e);
                }
            }
        }
        info!("Browser handler task completed");
    });

    Ok((browser, handler_task))
}

fn is_benign_cdp_error(message: &str) -> bool {
    message.contains("data did not match any variant of untagged enum Message")
        || message.contains("Failed to deserialize WS response")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_noise_is_filtered() {
        assert!(is_benign_cdp_error(
            "data did not match any variant of untagged enum Message at line 1"
        ));
        assert!(!is_benign_cdp_error("websocket connection closed"));
    }

    #[tokio::test]
    async fn existing_explicit_path_wins() {
        let exe = std::env::current_exe().unwrap();
        let found = find_browser_executable(Some(&exe)).await.unwrap();
        assert_eq!(found, exe);
    }
}
