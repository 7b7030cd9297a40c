//! Circuit breaker state machine

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use core_kernel::{CircuitBreakerConfig, PortError};
use serde::Serialize;
use tokio::time::Instant;

/// Breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Point-in-time view of a breaker, for health reporting
#[derive(Debug, Clone, Serialize)]
pub struct BreakerSnapshot {
    pub name: String,
    pub state: CircuitState,
    pub consecutive_failures: u32,
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trials_in_flight: u32,
    trial_successes: u32,
}

/// Per-dependency circuit breaker
///
/// State lives behind a plain mutex that is never held across an await.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    state: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            state: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                opened_at: None,
                trials_in_flight: 0,
                trial_successes: 0,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Current state, moving Open to HalfOpen once the cool-down has elapsed
    pub fn state(&self) -> CircuitState {
        let mut state = self.lock();
        self.refresh(&mut state);
        state.state
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        let mut state = self.lock();
        self.refresh(&mut state);
        BreakerSnapshot {
            name: self.name.clone(),
            state: state.state,
            consecutive_failures: state.consecutive_failures,
        }
    }

    /// Runs `operation` under the breaker and the configured call timeout
    ///
    /// While open the call is rejected with `ServiceUnavailable` without
    /// invoking `operation`. Definite answers from the peer (not found,
    /// rejected, conflict) count as successes.
    pub async fn call<T, F, Fut>(&self, operation: &str, f: F) -> Result<T, PortError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, PortError>>,
    {
        let permit = self.acquire(operation)?;

        let timeout = self.config.call_timeout();
        let outcome = match tokio::time::timeout(timeout, f()).await {
            Ok(result) => result,
            Err(_) => Err(PortError::Timeout {
                operation: format!("{}::{}", self.name, operation),
                duration_ms: self.config.call_timeout_ms,
            }),
        };

        match &outcome {
            Ok(_) => permit.settle(true),
            Err(e) if e.is_definite_answer() => permit.settle(true),
            Err(e) => {
                tracing::warn!(breaker = %self.name, operation, error = %e, "peer call failed");
                permit.settle(false);
            }
        }

        outcome
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refresh(&self, state: &mut BreakerState) {
        if state.state != CircuitState::Open {
            return;
        }
        let cooled_down = state
            .opened_at
            .map(|at| at.elapsed() >= self.config.reset_timeout())
            .unwrap_or(true);
        if cooled_down {
            state.state = CircuitState::HalfOpen;
            state.trials_in_flight = 0;
            state.trial_successes = 0;
            tracing::info!(breaker = %self.name, "circuit half-open, admitting trial calls");
        }
    }

    fn acquire(&self, operation: &str) -> Result<Permit<'_>, PortError> {
        let mut state = self.lock();
        self.refresh(&mut state);

        let trial = match state.state {
            CircuitState::Closed => false,
            CircuitState::HalfOpen if state.trials_in_flight < self.config.half_open_max_calls.max(1) => {
                state.trials_in_flight += 1;
                true
            }
            CircuitState::Open | CircuitState::HalfOpen => {
                tracing::debug!(breaker = %self.name, operation, "call short-circuited");
                return Err(PortError::unavailable(self.name.clone()));
            }
        };

        Ok(Permit {
            breaker: self,
            trial,
            settled: false,
        })
    }

    fn open(&self, state: &mut BreakerState) {
        state.state = CircuitState::Open;
        state.opened_at = Some(Instant::now());
        state.trials_in_flight = 0;
        state.trial_successes = 0;
        tracing::warn!(
            breaker = %self.name,
            failures = state.consecutive_failures,
            reset_timeout_ms = self.config.reset_timeout_ms,
            "circuit opened"
        );
    }

    fn record(&self, trial: bool, success: bool) {
        let mut state = self.lock();
        if trial {
            state.trials_in_flight = state.trials_in_flight.saturating_sub(1);
            if state.state != CircuitState::HalfOpen {
                return;
            }
            if success {
                state.trial_successes += 1;
                if state.trial_successes >= self.config.success_threshold.max(1) {
                    state.state = CircuitState::Closed;
                    state.consecutive_failures = 0;
                    state.opened_at = None;
                    tracing::info!(breaker = %self.name, "circuit closed");
                }
            } else {
                state.consecutive_failures += 1;
                self.open(&mut state);
            }
            return;
        }

        if state.state != CircuitState::Closed {
            return;
        }
        if success {
            state.consecutive_failures = 0;
        } else {
            state.consecutive_failures += 1;
            if state.consecutive_failures >= self.config.failure_threshold.max(1) {
                self.open(&mut state);
            }
        }
    }
}

/// Admission to make one call; releases its trial slot even if the caller is cancelled
struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    settled: bool,
}

impl Permit<'_> {
    fn settle(mut self, success: bool) {
        self.settled = true;
        self.breaker.record(self.trial, success);
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.settled && self.trial {
            let mut state = self.breaker.lock();
            state.trials_in_flight = state.trials_in_flight.saturating_sub(1);
        }
    }
}
