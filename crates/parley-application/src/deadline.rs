//! Optional per-operation deadline for storage calls.

use parley_core::error::{ParleyError, Result};
use std::future::Future;
use std::time::Duration;

/// Awaits `operation`, failing with [`ParleyError::Timeout`] after `limit`.
///
/// With `limit == None` the future is awaited without a deadline.
pub(crate) async fn with_deadline<T, F>(
    limit: Option<Duration>,
    name: &str,
    operation: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match limit {
        None => operation.await,
        Some(limit) => match tokio::time::timeout(limit, operation).await {
            Ok(result) => result,
            Err(_) => Err(ParleyError::timeout(name, limit.as_millis() as u64)),
        },
    }
}
