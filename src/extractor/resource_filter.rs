//! Declarative filter for sub-resource requests
//!
//! Only the DOM and the target anchor matter for extraction, so images, fonts
//! and stylesheets are aborted before they hit the network. The filter is a
//! plain predicate; the browser backend decides how to wire it into request
//! interception.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource category of an outgoing request, as reported by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Document,
    Stylesheet,
    Image,
    Media,
    Font,
    Script,
    Xhr,
    Fetch,
    Other,
}

impl ResourceCategory {
    /// Categories blocked by default
    pub const NON_ESSENTIAL: [Self; 3] = [Self::Image, Self::Font, Self::Stylesheet];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Stylesheet => "stylesheet",
            Self::Image => "image",
            Self::Media => "media",
            Self::Font => "font",
            Self::Script => "script",
            Self::Xhr => "xhr",
            Self::Fetch => "fetch",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" => Ok(Self::Document),
            "stylesheet" | "css" => Ok(Self::Stylesheet),
            "image" | "img" => Ok(Self::Image),
            "media" => Ok(Self::Media),
            "font" => Ok(Self::Font),
            "script" => Ok(Self::Script),
            "xhr" => Ok(Self::Xhr),
            "fetch" => Ok(Self::Fetch),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown resource category '{other}'")),
        }
    }
}

/// Abort predicate: a request is aborted iff its category is in the blocked set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFilter {
    blocked: Vec<ResourceCategory>,
}

impl ResourceFilter {
    #[must_use]
    pub fn new(blocked: impl IntoIterator<Item = ResourceCategory>) -> Self {
        let mut blocked: Vec<_> = blocked.into_iter().collect();
        blocked.sort();
        blocked.dedup();
        Self { blocked }
    }

    /// Filter that lets every request through
    #[must_use]
    pub fn allow_all() -> Self {
        Self { blocked: Vec::new() }
    }

    #[must_use]
    pub fn should_abort(&self, category: ResourceCategory) -> bool {
        self.blocked.contains(&category)
    }

    /// True when no category is blocked and interception can be skipped
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    #[must_use]
    pub fn blocked(&self) -> &[ResourceCategory] {
        &self.blocked
    }
}

impl Default for ResourceFilter {
    fn default() -> Self {
        Self::new(ResourceCategory::NON_ESSENTIAL)
    }
}
