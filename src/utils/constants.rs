//! Shared configuration constants for the extractor
//!
//! Default values used by [`ExtractorConfig`](crate::config::ExtractorConfig)
//! and the Chromium backend. Keeping them here avoids magic numbers in the
//! pipeline code.

/// Default listen port, matching the port the newsletter site proxies to.
pub const DEFAULT_PORT: u16 = 3001;

/// Default listen address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Ceiling for page navigation (seconds). Exceeding it fails the request.
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 30;

/// Ceiling for the loading overlay to disappear (seconds). Exceeding it is tolerated.
pub const DEFAULT_OVERLAY_TIMEOUT_SECS: u64 = 10;

/// Ceiling for the target element to become visible (seconds).
pub const DEFAULT_LOCATOR_TIMEOUT_SECS: u64 = 15;

/// Interval between DOM probes while waiting for the overlay or the locator.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Loading overlay rendered by the playlist page while its list is populated.
pub const DEFAULT_OVERLAY_SELECTOR: &str = "#loadingOverlay";

/// XPath of the "play all" anchor on the playlist page.
pub const DEFAULT_LOCATOR: &str =
    "/html/body/div[1]/div[3]/div[2]/div/div[3]/div/div[1]/ul/li[1]/a";

/// Links are only accepted when they point at an individual video page.
pub const DEFAULT_VIDEO_HOST_PATTERN: &str = r"^https?://([a-z0-9-]+\.)*tv\.naver\.com/v/";

/// Returned on fatal failures so the caller always has something to open.
pub const DEFAULT_FALLBACK_URL: &str =
    "https://tv.naver.com/sed.thumb?tab=playlist&playlistNo=972727";

/// Query parameter appended to recovered links.
pub const AUTOPLAY_PARAM: &str = "autoPlay=true";

/// Timeout applied to individual CDP commands by chromiumoxide.
pub const CDP_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Chrome user agent string
///
/// Headless Chrome advertises `HeadlessChrome` in its default user agent,
/// which some video hosts answer with a stripped-down page.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Prefix for per-launch Chrome profile directories in the temp dir.
pub const PROFILE_DIR_PREFIX: &str = "video_link_extractor_chrome";
