//! Configuration module for the extraction service
//!
//! This module provides the `ExtractorConfig` struct, its builder and the
//! environment loader used by the binary.

// Sub-modules
pub mod builder;
pub mod env;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::ExtractorConfigBuilder;
pub use types::{ConfigError, ExtractorConfig};
