//! HTTP call executor.
//!
//! # Responsibilities
//! - Perform one outbound GET under a hard deadline
//! - Collapse transport faults and non-2xx statuses into [`ClientError`]
//! - Give every call a request id and a tracing span
//!
//! The executor knows nothing about breakers; it only reports what happened.

use std::time::Duration;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::client::transport::Transport;
use crate::error::{ClientError, ClientResult};
use crate::resilience::timeouts::with_deadline;

/// Runs calls through a [`Transport`].
#[derive(Debug, Clone)]
pub struct CallExecutor<T> {
    transport: T,
}

impl<T: Transport> CallExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `url`, returning the body of a 2xx response.
    ///
    /// The deadline bounds the whole exchange, body included.
    pub async fn call(&self, url: &Url, timeout: Duration) -> ClientResult<Vec<u8>> {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::debug_span!("outbound_call", url = %url, request_id = %request_id);
        self.execute(url, timeout, &request_id).instrument(span).await
    }

    async fn execute(&self, url: &Url, timeout: Duration, request_id: &str) -> ClientResult<Vec<u8>> {
        let response = with_deadline(timeout, self.transport.get(url, request_id)).await?;
        if !response.is_success() {
            tracing::debug!(status = response.status, "Non-success status");
            return Err(ClientError::Upstream {
                status: response.status,
            });
        }
        tracing::trace!(bytes = response.body.len(), "Response received");
        Ok(response.body)
    }
}
