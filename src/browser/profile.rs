//! Per-launch Chrome profile directories
//!
//! Every launch gets a fresh UUID-named directory under the temp dir so two
//! browsers never contend for the same `SingletonLock`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// RAII wrapper for a Chrome profile directory
///
/// The directory is removed on drop. Drop it only after the browser process
/// has exited, otherwise Chrome may still hold files open.
#[derive(Debug)]
pub struct BrowserProfile {
    path: PathBuf,
}

impl BrowserProfile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BrowserProfile {
    fn drop(&mut self) {
        if self.path.exists() {
            info!("Removing browser profile {}", self.path.display());
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                warn!(
                    "Failed to remove profile directory {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Create `<temp>/<prefix>_<uuid>`
pub fn create_unique_profile(prefix: &str) -> Result<BrowserProfile> {
    create_profile_in(&std::env::temp_dir(), prefix)
}

fn create_profile_in(parent: &Path, prefix: &str) -> Result<BrowserProfile> {
    let path = parent.join(format!("{}_{}", prefix, Uuid::new_v4()));
    debug!("Creating browser profile: {}", path.display());

    // create_dir (not create_dir_all) so an existing directory is an error
    std::fs::create_dir(&path)
        .with_context(|| format!("Failed to create profile directory: {}", path.display()))?;

    Ok(BrowserProfile { path })
}
