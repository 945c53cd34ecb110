//! URL helpers used by request validation and link normalization.

use url::Url;

use super::constants::AUTOPLAY_PARAM;

/// Check if a URL is an absolute http(s) URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}

/// Append the autoplay parameter to a recovered link.
///
/// Uses `&` when the link already carries a query string and `?` otherwise.
/// The rest of the link is kept byte-for-byte; a fragment, if any, stays last.
///
/// ```
/// use video_link_extractor::utils::append_autoplay;
///
/// assert_eq!(
///     append_autoplay("https://videohost.example/v/abc?x=1"),
///     "https://videohost.example/v/abc?x=1&autoPlay=true"
/// );
/// assert_eq!(
///     append_autoplay("https://videohost.example/v/abc"),
///     "https://videohost.example/v/abc?autoPlay=true"
/// );
/// ```
#[must_use]
pub fn append_autoplay(href: &str) -> String {
    let (base, fragment) = match href.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (href, None),
    };

    let separator = if base.contains('?') {
        if base.ends_with('?') || base.ends_with('&') {
            ""
        } else {
            "&"
        }
    } else {
        "?"
    };

    let mut out = String::with_capacity(href.len() + AUTOPLAY_PARAM.len() + 1);
    out.push_str(base);
    out.push_str(separator);
    out.push_str(AUTOPLAY_PARAM);
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
