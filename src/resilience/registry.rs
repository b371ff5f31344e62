//! Per-service circuit registry.
//!
//! # Responsibilities
//! - Own exactly one breaker per registered service name
//! - Serialize every read-modify-write on a breaker
//! - Emit a log event and metrics for every transition and blocked request
//!
//! # Design Decisions
//! - The service set is fixed at construction; unknown names are errors
//! - Entry locks are held only for the O(1) state update, never across I/O
//! - Events are emitted after the entry lock is released

use dashmap::DashMap;
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::config::ClientConfig;
use crate::error::UnknownService;
use crate::observability::{logging, metrics};
use crate::resilience::circuit_breaker::{
    Admission, BreakerPolicy, BreakerState, CircuitState, Transition,
};

/// Read-only view of one breaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakerSnapshot {
    pub service: String,
    pub state: CircuitState,
    pub failure_count: u32,
    /// Milliseconds since the most recent recorded failure.
    pub since_last_failure_ms: Option<u64>,
}

/// Thread-safe registry of circuit breakers keyed by service name.
#[derive(Debug)]
pub struct CircuitRegistry {
    breakers: DashMap<String, BreakerState>,
    policy: BreakerPolicy,
}

impl CircuitRegistry {
    /// Create a registry with a closed breaker for every service.
    pub fn new<I, S>(policy: BreakerPolicy, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let breakers = DashMap::new();
        for service in services {
            let service = service.into();
            metrics::record_circuit_state(&service, CircuitState::Closed);
            breakers.insert(service, BreakerState::new());
        }

        tracing::debug!(
            services = breakers.len(),
            max_failures = policy.max_failures,
            reset_timeout_secs = policy.reset_timeout.as_secs(),
            "Circuit registry initialized"
        );

        Self { breakers, policy }
    }

    /// Create a registry from validated configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            BreakerPolicy::from(&config.breaker),
            config.services.names.iter().cloned(),
        )
    }

    pub fn policy(&self) -> &BreakerPolicy {
        &self.policy
    }

    pub fn contains(&self, service: &str) -> bool {
        self.breakers.contains_key(service)
    }

    /// Copy of a breaker's current state.
    pub fn get(&self, service: &str) -> Result<BreakerState, UnknownService> {
        self.breakers
            .get(service)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| UnknownService(service.to_string()))
    }

    /// Check whether a call to `service` may proceed at `now`.
    ///
    /// Moves an open breaker to half-open once its cooldown has elapsed.
    pub fn admit(&self, service: &str, now: Instant) -> Result<Admission, UnknownService> {
        let (admission, failure_count) = self.update(service, |breaker| {
            let admission = breaker.admit(now, &self.policy);
            (admission, breaker.failure_count())
        })?;

        match admission {
            Admission::Admitted => {}
            Admission::Trial => {
                emit_transition(
                    service,
                    Transition {
                        from: CircuitState::Open,
                        to: CircuitState::HalfOpen,
                    },
                    failure_count,
                );
            }
            Admission::Blocked => {
                metrics::record_blocked(service);
                tracing::warn!(
                    service = %service,
                    state = "blocked",
                    failure_count,
                    at = %logging::event_timestamp(),
                    "Request blocked by open circuit"
                );
            }
        }
        Ok(admission)
    }

    /// Record a successful call to `service`.
    pub fn record_success(&self, service: &str) -> Result<(), UnknownService> {
        let (transition, failure_count) = self.update(service, |breaker| {
            (breaker.on_success(), breaker.failure_count())
        })?;
        if let Some(transition) = transition {
            emit_transition(service, transition, failure_count);
        }
        Ok(())
    }

    /// Record a failed call to `service` observed at `now`.
    pub fn record_failure(&self, service: &str, now: Instant) -> Result<(), UnknownService> {
        let (transition, failure_count) = self.update(service, |breaker| {
            (breaker.on_failure(now, &self.policy), breaker.failure_count())
        })?;
        match transition {
            Some(transition) => emit_transition(service, transition, failure_count),
            None => tracing::debug!(
                service = %service,
                failure_count,
                max_failures = self.policy.max_failures,
                "Failure recorded"
            ),
        }
        Ok(())
    }

    /// Snapshot of one breaker relative to `now`.
    pub fn snapshot(&self, service: &str, now: Instant) -> Result<BreakerSnapshot, UnknownService> {
        self.get(service).map(|breaker| to_snapshot(service, &breaker, now))
    }

    /// Snapshots of every breaker, sorted by service name.
    pub fn snapshots(&self, now: Instant) -> Vec<BreakerSnapshot> {
        let mut all: Vec<_> = self
            .breakers
            .iter()
            .map(|entry| to_snapshot(entry.key(), entry.value(), now))
            .collect();
        all.sort_by(|a, b| a.service.cmp(&b.service));
        all
    }

    fn update<R>(
        &self,
        service: &str,
        f: impl FnOnce(&mut BreakerState) -> R,
    ) -> Result<R, UnknownService> {
        let mut entry = self
            .breakers
            .get_mut(service)
            .ok_or_else(|| UnknownService(service.to_string()))?;
        Ok(f(entry.value_mut()))
    }
}

fn to_snapshot(service: &str, breaker: &BreakerState, now: Instant) -> BreakerSnapshot {
    BreakerSnapshot {
        service: service.to_string(),
        state: breaker.state(),
        failure_count: breaker.failure_count(),
        since_last_failure_ms: breaker
            .last_failure_time()
            .map(|last| now.saturating_duration_since(last))
            .map(|elapsed: Duration| elapsed.as_millis() as u64),
    }
}

fn emit_transition(service: &str, transition: Transition, failure_count: u32) {
    metrics::record_transition(service, transition);
    let at = logging::event_timestamp();
    if transition.to == CircuitState::Open {
        tracing::warn!(
            service = %service,
            from = %transition.from,
            to = %transition.to,
            failure_count,
            at = %at,
            "Circuit opened, requests will be blocked"
        );
    } else {
        tracing::info!(
            service = %service,
            from = %transition.from,
            to = %transition.to,
            failure_count,
            at = %at,
            "Circuit state changed"
        );
    }
}
