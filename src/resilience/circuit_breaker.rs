//! Circuit breaker state machine.
//!
//! # States
//! - Closed: normal operation, requests pass through
//! - Open: service assumed down, requests fail fast
//! - Half-Open: testing if service recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure_count >= max_failures
//! Open → Half-Open: first admission strictly after last_failure + reset_timeout
//! Half-Open → Closed: trial call succeeds
//! Half-Open → Open: trial call fails
//! ```
//!
//! # Design Decisions
//! - Pure: callers supply the clock reading, nothing here blocks or sleeps
//! - Half-Open admits every caller that races in; it is not a single-flight gate
//! - Failure count is not reset on Open → Half-Open, so a failed trial re-crosses
//!   the threshold immediately

use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

use crate::config::BreakerConfig;

/// Circuit state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed = 0,
    Open = 1,
    HalfOpen = 2,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds shared by every breaker in a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerPolicy {
    /// Failures recorded before the circuit opens.
    pub max_failures: u32,
    /// How long an open circuit blocks before admitting a trial.
    pub reset_timeout: Duration,
}

impl Default for BreakerPolicy {
    fn default() -> Self {
        Self::from(&BreakerConfig::default())
    }
}

impl From<&BreakerConfig> for BreakerPolicy {
    fn from(config: &BreakerConfig) -> Self {
        Self {
            max_failures: config.max_failures,
            reset_timeout: config.reset_timeout(),
        }
    }
}

/// A change of circuit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: CircuitState,
    pub to: CircuitState,
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Closed or already half-open; call proceeds.
    Admitted,
    /// Cooldown elapsed; circuit moved Open → Half-Open and this call is the trial.
    Trial,
    /// Circuit open and cooling down; no call may be made.
    Blocked,
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        !matches!(self, Admission::Blocked)
    }
}

/// Per-service breaker state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakerState {
    state: CircuitState,
    failure_count: u32,
    last_failure_time: Option<Instant>,
}

impl Default for BreakerState {
    fn default() -> Self {
        Self::new()
    }
}

impl BreakerState {
    /// A closed breaker with no recorded failures.
    pub fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            last_failure_time: None,
        }
    }

    pub fn state(&self) -> CircuitState {
        self.state
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    pub fn last_failure_time(&self) -> Option<Instant> {
        self.last_failure_time
    }

    /// Decide whether a call may proceed at `now`.
    pub fn admit(&mut self, now: Instant, policy: &BreakerPolicy) -> Admission {
        match self.state {
            CircuitState::Closed | CircuitState::HalfOpen => Admission::Admitted,
            CircuitState::Open => {
                let cooled_down = match self.last_failure_time {
                    // A deadline past the end of representable time never arrives.
                    Some(last) => last
                        .checked_add(policy.reset_timeout)
                        .is_some_and(|deadline| now > deadline),
                    // Open is only entered from on_failure, which stamps the time.
                    None => true,
                };
                if cooled_down {
                    self.state = CircuitState::HalfOpen;
                    Admission::Trial
                } else {
                    Admission::Blocked
                }
            }
        }
    }

    /// Record a successful call.
    pub fn on_success(&mut self) -> Option<Transition> {
        match self.state {
            CircuitState::HalfOpen => {
                self.state = CircuitState::Closed;
                self.failure_count = 0;
                Some(Transition {
                    from: CircuitState::HalfOpen,
                    to: CircuitState::Closed,
                })
            }
            CircuitState::Closed => {
                self.failure_count = 0;
                None
            }
            CircuitState::Open => None,
        }
    }

    /// Record a failed call observed at `now`.
    pub fn on_failure(&mut self, now: Instant, policy: &BreakerPolicy) -> Option<Transition> {
        self.failure_count = self.failure_count.saturating_add(1);
        self.last_failure_time = Some(now);

        if self.failure_count >= policy.max_failures && self.state != CircuitState::Open {
            let from = self.state;
            self.state = CircuitState::Open;
            return Some(Transition {
                from,
                to: CircuitState::Open,
            });
        }
        None
    }
}
