//! Error taxonomy shared by every service
//!
//! Each domain keeps its own `thiserror` enum, but every variant classifies
//! itself into one [`ErrorKind`] and carries a stable machine-readable code.
//! Callers branch on the kind; clients branch on the code.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a failure, independent of the domain that raised it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed or missing input
    InvalidRequest,
    /// Referenced entity is absent
    NotFound,
    /// Entity already exists
    Conflict,
    /// Caller does not own the referenced entity
    Forbidden,
    /// A peer service is unreachable or its circuit is open
    DependencyUnavailable,
    /// Unexpected local fault
    InternalFailure,
}

impl ErrorKind {
    /// HTTP status code this kind is rendered with
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::InvalidRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Forbidden => 403,
            ErrorKind::DependencyUnavailable => 503,
            ErrorKind::InternalFailure => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "INVALID_REQUEST",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::DependencyUnavailable => "DEPENDENCY_UNAVAILABLE",
            ErrorKind::InternalFailure => "INTERNAL_FAILURE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every domain error enum
pub trait DomainError: std::error::Error + Send + Sync + 'static {
    /// Taxonomy bucket of this error
    fn kind(&self) -> ErrorKind;

    /// Stable code such as `POLICY_NOT_FOUND`
    fn code(&self) -> &'static str;

    /// Message safe to show to a caller
    ///
    /// Internal failures never expose their details.
    fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::InternalFailure => "An unexpected error occurred".to_string(),
            _ => self.to_string(),
        }
    }
}

/// A rejected input field, carrying its sub-code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    pub code: &'static str,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
