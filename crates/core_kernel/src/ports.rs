//! Port plumbing shared by repositories and peer clients
//!
//! Every collaborator a service talks to (a peer service or its own
//! repository) sits behind a port trait. Ports share one error type so the
//! resilience layer can classify failures without knowing which adapter
//! produced them.
//!
//! ```text
//!        Orchestrator / Pipeline
//!                 │
//!                 ▼
//!    ┌──────────────────────────┐
//!    │  Port traits             │  ProductClient, PolicyRepository, ...
//!    └──────────────────────────┘
//!        ▲                 ▲
//!        │                 │
//!  In-process / DB    HTTP peer adapter
//!    adapters         (behind a circuit breaker)
//! ```

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by any repository or peer client
///
/// Services translate these into their own error codes; the breaker only
/// looks at [`PortError::is_definite_answer`] and [`PortError::is_transient`].
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// The peer rejected the request as invalid
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout { operation: String, duration_ms: u64 },

    /// The peer refused our credentials
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The peer is unavailable or its circuit is open
    #[error("Service unavailable: {service}")]
    ServiceUnavailable { service: String },

    /// A response could not be decoded
    #[error("Transformation error: {message}")]
    Transformation { message: String },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    pub fn unavailable(service: impl Into<String>) -> Self {
        PortError::ServiceUnavailable {
            service: service.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, PortError::Conflict { .. })
    }

    /// Returns true if the peer answered definitively
    ///
    /// Definite answers (not found, rejected, conflicting) prove the peer is
    /// healthy and must not count against its circuit breaker.
    pub fn is_definite_answer(&self) -> bool {
        matches!(
            self,
            PortError::NotFound { .. } | PortError::Validation { .. } | PortError::Conflict { .. }
        )
    }
}

/// Supertrait of every repository and client trait
pub trait DomainPort: Send + Sync + 'static {}

/// Circuit breaker configuration for peer adapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before opening the circuit
    pub failure_threshold: u32,
    /// How long the circuit stays open before half-opening
    pub reset_timeout_ms: u64,
    /// Successful trial calls needed to close the circuit from half-open
    pub success_threshold: u32,
    /// Trial calls admitted concurrently while half-open
    pub half_open_max_calls: u32,
    /// Upper bound on a single wrapped call
    pub call_timeout_ms: u64,
}

impl CircuitBreakerConfig {
    pub fn reset_timeout(&self) -> Duration {
        Duration::from_millis(self.reset_timeout_ms)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout_ms: 30_000,
            success_threshold: 1,
            half_open_max_calls: 1,
            call_timeout_ms: 5_000,
        }
    }
}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    /// Circuit closed, or the database answers
    Healthy,
    /// Adapter is probing a recovering peer
    Degraded,
    /// Adapter is rejecting calls
    Unhealthy,
}

/// One entry of the readiness report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Peer service name, or `postgres`
    pub adapter_id: String,
    pub status: AdapterHealth,
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

/// Anything the readiness endpoint reports on: breakers and the database
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthCheckResult;
}
