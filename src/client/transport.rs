//! HTTP transport used for outbound GETs.
//!
//! # Responsibilities
//! - Issue a single GET and return status + body
//! - Tag the request with an `X-Request-Id`
//! - Map connection, DNS and body-read faults to [`ClientError::Transport`]
//!
//! Deadlines are applied by the caller, not here.

use reqwest::Client;
use std::future::Future;
use url::Url;

use crate::config::HttpConfig;
use crate::error::{ClientError, ClientResult};

/// Header carrying the per-call correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Status line and body of a completed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can perform a GET.
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url, request_id: &str) -> impl Future<Output = ClientResult<RawResponse>> + Send;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport from HTTP settings.
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            // Internal calls never go through an egress proxy.
            .no_proxy()
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url, request_id: &str) -> impl Future<Output = ClientResult<RawResponse>> + Send {
        let request = self
            .client
            .get(url.clone())
            .header(REQUEST_ID_HEADER, request_id);

        async move {
            let response = request
                .send()
                .await
                .map_err(|e| ClientError::Transport(e.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|e| ClientError::Transport(e.to_string()))?;
            Ok(RawResponse {
                status,
                body: body.to_vec(),
            })
        }
    }
}
