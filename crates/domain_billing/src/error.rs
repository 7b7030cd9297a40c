//! Billing domain errors

use core_kernel::{DomainError, ErrorKind, PolicyId, PortError, ValidationFailure};
use thiserror::Error;

/// Errors that can occur while processing or reading payments
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error(transparent)]
    Invalid(#[from] ValidationFailure),

    #[error("Payment already exists for policy ID: {0}")]
    AlreadyExists(PolicyId),

    #[error("Payment not found for {0}")]
    NotFound(String),

    #[error("Failed to process payment: {0}")]
    ProcessingFailed(PortError),

    #[error("Payment lookup failed: {0}")]
    Storage(PortError),
}

impl DomainError for PaymentError {
    fn kind(&self) -> ErrorKind {
        match self {
            PaymentError::Invalid(_) => ErrorKind::InvalidRequest,
            PaymentError::AlreadyExists(_) => ErrorKind::Conflict,
            PaymentError::NotFound(_) => ErrorKind::NotFound,
            PaymentError::ProcessingFailed(_) | PaymentError::Storage(_) => ErrorKind::InternalFailure,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            PaymentError::Invalid(failure) => failure.code,
            PaymentError::AlreadyExists(_) => "PAYMENT_ALREADY_EXISTS",
            PaymentError::NotFound(_) => "PAYMENT_NOT_FOUND",
            PaymentError::ProcessingFailed(_) => "PAYMENT_PROCESSING_FAILED",
            PaymentError::Storage(_) => "PAYMENT_LOOKUP_FAILED",
        }
    }
}

impl From<PaymentError> for PortError {
    fn from(error: PaymentError) -> Self {
        match error {
            PaymentError::NotFound(what) => PortError::not_found("Payment", what),
            PaymentError::Invalid(failure) => PortError::validation(failure.message),
            PaymentError::AlreadyExists(_) => PortError::conflict(error.to_string()),
            PaymentError::ProcessingFailed(source) | PaymentError::Storage(source) => source,
        }
    }
}
