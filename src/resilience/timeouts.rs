//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap outbound calls with a hard deadline
//! - Cancel the call cleanly when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the deadline covers connect, headers and body
//! - Timeout errors are distinct from other transport errors

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::error::{ClientError, ClientResult};

/// Run `fut`, failing with [`ClientError::Timeout`] if it outlives `deadline`.
pub async fn with_deadline<F, T>(deadline: Duration, fut: F) -> ClientResult<T>
where
    F: Future<Output = ClientResult<T>>,
{
    match timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(ClientError::Timeout(deadline)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let result = with_deadline(Duration::from_secs(1), async { Ok::<_, ClientError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_slow_future_times_out() {
        let deadline = Duration::from_millis(20);
        let result = with_deadline(deadline, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ClientError>(())
        })
        .await;
        assert!(matches!(result, Err(ClientError::Timeout(d)) if d == deadline));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: ClientResult<()> = with_deadline(Duration::from_secs(1), async {
            Err(ClientError::Upstream { status: 502 })
        })
        .await;
        assert!(matches!(result, Err(ClientError::Upstream { status: 502 })));
    }
}
