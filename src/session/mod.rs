//! Page session management
//!
//! Owns the shared browser process and hands out one short-lived page per
//! extraction request.

mod backend;
mod lease;
mod manager;

pub use backend::{BrowserLauncher, BrowserSession, ElementProbe, PageDriver, PageOf};
pub use lease::PageLease;
pub use manager::{CloseOutcome, SessionManager, SessionPhase};
