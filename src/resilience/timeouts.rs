//! Timeout enforcement for backend calls.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// The backend did not answer within the configured limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("backend did not respond within {0:?}")]
pub struct TimeoutError(pub Duration);

/// Run `fut` with a deadline of `limit`.
pub async fn deadline<F: Future>(limit: Duration, fut: F) -> Result<F::Output, TimeoutError> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| TimeoutError(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deadline_passes_fast_future() {
        let out = deadline(Duration::from_secs(1), async { 7 }).await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test]
    async fn test_deadline_elapses() {
        let limit = Duration::from_millis(20);
        let out = deadline(limit, tokio::time::sleep(Duration::from_secs(5))).await;
        assert_eq!(out, Err(TimeoutError(limit)));
    }
}
