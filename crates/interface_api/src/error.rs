//! API error handling
//!
//! Every failure leaves the API as the same envelope:
//!
//! ```json
//! {"errorMessage": "...", "errorCode": "POLICY_NOT_FOUND", "timestamp": "...", "path": "/policy/9"}
//! ```
//!
//! Handlers return [`ApiError`]; its response carries [`ErrorDetails`] in the
//! extensions and [`crate::middleware::error_envelope`] fills in the request
//! path.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use core_kernel::{DomainError, ErrorKind, ValidationFailure};
use domain_billing::PaymentError;
use domain_claims::ClaimError;
use domain_policy::PolicyError;
use domain_product::ProductError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub error_message: String,
    pub error_code: String,
    pub timestamp: DateTime<Utc>,
    pub path: String,
}

/// Code and message of a failed request, kept until the path is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub code: &'static str,
    pub message: String,
}

impl ErrorDetails {
    pub fn envelope(&self, path: impl Into<String>) -> ErrorEnvelope {
        ErrorEnvelope {
            error_message: self.message.clone(),
            error_code: self.code.to_string(),
            timestamp: Utc::now(),
            path: path.into(),
        }
    }
}

/// API error types
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    kind: ErrorKind,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    /// Renders a domain error, hiding internal details from the caller
    pub fn from_domain<E: DomainError>(error: &E) -> Self {
        let kind = error.kind();
        if kind == ErrorKind::InternalFailure {
            tracing::error!(code = error.code(), error = %error, "request failed");
        }
        Self::new(kind, error.code(), error.public_message())
    }

    pub fn route_not_found() -> Self {
        Self::new(ErrorKind::NotFound, "RESOURCE_NOT_FOUND", "No such resource")
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = ErrorDetails {
            code: self.code,
            message: self.message,
        };
        let mut response = (status, Json(details.envelope(String::new()))).into_response();
        response.extensions_mut().insert(details);
        response
    }
}

macro_rules! from_domain_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<$error> for ApiError {
                fn from(error: $error) -> Self {
                    ApiError::from_domain(&error)
                }
            }
        )*
    };
}

from_domain_error!(ProductError, PolicyError, PaymentError, ClaimError);

impl From<ValidationFailure> for ApiError {
    fn from(failure: ValidationFailure) -> Self {
        ApiError::new(ErrorKind::InvalidRequest, failure.code, failure.message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(ErrorKind::InvalidRequest, "MALFORMED_REQUEST", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::new(ErrorKind::InvalidRequest, "INVALID_PATH_PARAMETER", rejection.body_text())
    }
}
