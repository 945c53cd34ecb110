//! Headless-browser service that recovers a video link from a listing page
//!
//! A request names a page URL and an XPath locator. The page is loaded in a
//! shared Chromium session with images, fonts and stylesheets blocked; once
//! any loading overlay is gone, the first visible match is read, its href is
//! checked against the video host, and `autoPlay=true` is appended.
//!
//! The browser is reached only through the [`session`] traits, so the
//! pipeline and the HTTP layer run unchanged against in-memory fakes.

pub mod browser;
pub mod config;
pub mod error;
pub mod extractor;
pub mod server;
pub mod session;
pub mod utils;

pub use browser::ChromiumLauncher;
pub use config::{ConfigError, ExtractorConfig, ExtractorConfigBuilder};
pub use error::{ExtractError, ExtractResult};
pub use extractor::{
    ExtractionOutcome, ExtractionRequest, ExtractionResult, MissReason, ResourceCategory,
    ResourceFilter, extract, spawn_extraction,
};
pub use server::{AppState, create_router, serve};
pub use session::{
    BrowserLauncher, BrowserSession, CloseOutcome, ElementProbe, PageDriver, PageLease,
    SessionManager, SessionPhase,
};
