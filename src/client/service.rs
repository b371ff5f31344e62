//! Breaker-guarded access to internal services.
//!
//! # Flow
//! ```text
//! fetch(service, resource, id)
//!     → registry.admit (blocked? return without I/O)
//!     → executor.call (deadline-bounded GET, lock not held)
//!     → decode record
//!     → registry.record_success / record_failure
//! ```
//!
//! `try_*` methods return a tagged [`ClientResult`] so callers can tell a blocked
//! request from a downstream failure. The plain methods collapse every failure to
//! `None`, logging the reason.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::client::clock::{Clock, MonotonicClock};
use crate::client::executor::CallExecutor;
use crate::client::records::{decode_record, TemplateRecord, UserRecord};
use crate::client::transport::{HttpTransport, Transport};
use crate::config::{ClientConfig, ConfigError, TEMPLATE_SERVICE, USER_SERVICE};
use crate::error::{ClientError, ClientResult};
use crate::observability::metrics;
use crate::resilience::CircuitRegistry;

/// Client for the user and template services.
pub struct ServiceClient<T = HttpTransport, C = MonotonicClock> {
    registry: Arc<CircuitRegistry>,
    executor: CallExecutor<T>,
    clock: C,
    base_url: Url,
    timeout: Duration,
}

impl ServiceClient {
    /// Wire a client from validated configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let registry = Arc::new(CircuitRegistry::from_config(config));
        let transport = HttpTransport::new(&config.http)?;
        let base_url = Url::parse(&config.http.base_url)?;
        Self::new(
            registry,
            transport,
            MonotonicClock,
            base_url,
            config.http.request_timeout(),
        )
    }
}

impl<T: Transport, C: Clock> ServiceClient<T, C> {
    pub fn new(
        registry: Arc<CircuitRegistry>,
        transport: T,
        clock: C,
        base_url: Url,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            registry,
            executor: CallExecutor::new(transport),
            clock,
            base_url,
            timeout,
        })
    }

    pub fn registry(&self) -> &Arc<CircuitRegistry> {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        self.executor.transport()
    }

    /// Fetch a user from the user service.
    pub async fn get_user_data(&self, user_id: &str) -> Option<UserRecord> {
        self.fetch(USER_SERVICE, "users", user_id).await
    }

    /// Fetch a template from the template service.
    pub async fn get_template_data(&self, template_code: &str) -> Option<TemplateRecord> {
        self.fetch(TEMPLATE_SERVICE, "templates", template_code).await
    }

    pub async fn try_get_user_data(&self, user_id: &str) -> ClientResult<UserRecord> {
        self.try_fetch(USER_SERVICE, "users", user_id).await
    }

    pub async fn try_get_template_data(&self, template_code: &str) -> ClientResult<TemplateRecord> {
        self.try_fetch(TEMPLATE_SERVICE, "templates", template_code).await
    }

    /// Fetch `{base_url}/{resource}/{identifier}/`, returning `None` on any failure.
    pub async fn fetch<R: DeserializeOwned>(
        &self,
        service: &str,
        resource: &str,
        identifier: &str,
    ) -> Option<R> {
        match self.try_fetch(service, resource, identifier).await {
            Ok(record) => Some(record),
            Err(ClientError::UnknownService(e)) => {
                tracing::error!(error = %e, resource = %resource, "Fetch against unregistered service");
                None
            }
            Err(ClientError::CircuitOpen { .. }) => None,
            Err(e) => {
                tracing::warn!(
                    service = %service,
                    resource = %resource,
                    identifier = %identifier,
                    kind = e.kind(),
                    error = %e,
                    "Fetch failed"
                );
                None
            }
        }
    }

    /// Fetch `{base_url}/{resource}/{identifier}/` through the service's breaker.
    pub async fn try_fetch<R: DeserializeOwned>(
        &self,
        service: &str,
        resource: &str,
        identifier: &str,
    ) -> ClientResult<R> {
        let url = compose_url(&self.base_url, resource, identifier);

        let admission = self.registry.admit(service, self.clock.now())?;
        if !admission.is_admitted() {
            return Err(ClientError::CircuitOpen {
                service: service.to_string(),
            });
        }

        let start = Instant::now();
        let result = self
            .executor
            .call(&url, self.timeout)
            .await
            .and_then(|body| decode_record::<R>(&body));

        match &result {
            Ok(_) => {
                self.registry.record_success(service)?;
                metrics::record_request(service, "success", start);
            }
            Err(e) => {
                if e.counts_as_failure() {
                    self.registry.record_failure(service, self.clock.now())?;
                }
                metrics::record_request(service, e.kind(), start);
            }
        }
        result
    }
}

/// Append `resource/identifier/` to the base path, encoding each as one segment.
pub fn compose_url(base: &Url, resource: &str, identifier: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(resource).push(identifier).push("");
    }
    url
}
