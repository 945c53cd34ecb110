//! Timeout utilities for page operations
//!
//! Provides async timeout wrappers to prevent indefinite hangs during
//! page navigation and other browser operations.

use std::future::Future;
use std::time::Duration;

use crate::error::{ExtractError, ExtractResult};

/// Wrap an async page operation with an explicit ceiling
///
/// # Returns
/// * `Ok(T)` - Operation completed successfully
/// * `Err` - Either the operation failed or the timeout was reached; the
///   timeout message names the operation and the ceiling
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> ExtractResult<T>
where
    F: Future<Output = ExtractResult<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(ExtractError::Browser(format!(
            "{operation_name} timeout after {} seconds",
            timeout.as_secs()
        ))),
    }
}
