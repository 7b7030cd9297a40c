//! Claims domain errors
//!
//! One variant per way a claim can be refused. The pipeline raises the
//! first one it meets and never continues past it.

use chrono::{DateTime, Utc};
use core_kernel::{DomainError, ErrorKind, PolicyId, PortError, ValidationFailure};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while filing or reading claims
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error(transparent)]
    Invalid(#[from] ValidationFailure),

    #[error("Policy not found with ID: {0}")]
    PolicyNotFound(PolicyId),

    #[error("Policy is not active. Current status: {status}")]
    PolicyNotActive { status: String },

    #[error("Policy has not started yet. Start date: {0}")]
    PolicyNotStarted(DateTime<Utc>),

    #[error("Policy has expired. End date: {0}")]
    PolicyExpired(DateTime<Utc>),

    /// No premium recorded; the policy cannot be claimed against yet
    #[error("No payment found for policy ID: {0}")]
    PaymentNotFound(PolicyId),

    /// The claimant is not the customer who paid for the policy
    ///
    /// The message never names the customer on record.
    #[error("Customer ID does not match policy {policy_id}")]
    CustomerMismatch { policy_id: PolicyId },

    #[error("Payment not successful for policy ID: {policy_id}. Status: {status}")]
    PaymentNotSuccessful { policy_id: PolicyId, status: String },

    #[error("Claim amount ({amount}) exceeds policy coverage ({coverage})")]
    ClaimAmountExceedsCoverage { amount: Decimal, coverage: Decimal },

    #[error("Claim already exists for policy ID: {0}")]
    ClaimAlreadyExists(PolicyId),

    #[error("Policy Service is not available")]
    PolicyServiceUnavailable,

    #[error("Payment Service is not available")]
    PaymentServiceUnavailable,

    /// A peer answered in a way the pipeline could not use
    #[error("Claim validation failed: {0}")]
    ValidationFailed(String),

    #[error("Claim not found for {0}")]
    ClaimNotFound(String),

    #[error("Failed to file claim: {0}")]
    FilingFailed(PortError),

    #[error("Claim lookup failed: {0}")]
    Storage(PortError),
}

impl ClaimError {
    /// Classifies a failed policy-service call
    pub fn from_policy_call(policy_id: PolicyId, error: PortError) -> Self {
        match error {
            PortError::NotFound { .. } => ClaimError::PolicyNotFound(policy_id),
            e if e.is_transient() => ClaimError::PolicyServiceUnavailable,
            other => ClaimError::ValidationFailed(other.to_string()),
        }
    }

    /// Classifies a failed payment-service call
    pub fn from_payment_call(policy_id: PolicyId, error: PortError) -> Self {
        match error {
            PortError::NotFound { .. } => ClaimError::PaymentNotFound(policy_id),
            e if e.is_transient() => ClaimError::PaymentServiceUnavailable,
            other => ClaimError::ValidationFailed(other.to_string()),
        }
    }
}

impl DomainError for ClaimError {
    fn kind(&self) -> ErrorKind {
        match self {
            ClaimError::Invalid(_)
            | ClaimError::PolicyNotActive { .. }
            | ClaimError::PolicyNotStarted(_)
            | ClaimError::PolicyExpired(_)
            | ClaimError::PaymentNotFound(_)
            | ClaimError::PaymentNotSuccessful { .. }
            | ClaimError::ClaimAmountExceedsCoverage { .. } => ErrorKind::InvalidRequest,
            ClaimError::PolicyNotFound(_) | ClaimError::ClaimNotFound(_) => ErrorKind::NotFound,
            ClaimError::CustomerMismatch { .. } => ErrorKind::Forbidden,
            ClaimError::ClaimAlreadyExists(_) => ErrorKind::Conflict,
            ClaimError::PolicyServiceUnavailable | ClaimError::PaymentServiceUnavailable => {
                ErrorKind::DependencyUnavailable
            }
            ClaimError::ValidationFailed(_) | ClaimError::FilingFailed(_) | ClaimError::Storage(_) => {
                ErrorKind::InternalFailure
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ClaimError::Invalid(failure) => failure.code,
            ClaimError::PolicyNotFound(_) => "POLICY_NOT_FOUND",
            ClaimError::PolicyNotActive { .. } => "POLICY_NOT_ACTIVE",
            ClaimError::PolicyNotStarted(_) => "POLICY_NOT_STARTED",
            ClaimError::PolicyExpired(_) => "POLICY_EXPIRED",
            ClaimError::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            ClaimError::CustomerMismatch { .. } => "CUSTOMER_MISMATCH",
            ClaimError::PaymentNotSuccessful { .. } => "PAYMENT_NOT_SUCCESSFUL",
            ClaimError::ClaimAmountExceedsCoverage { .. } => "CLAIM_AMOUNT_EXCEEDS_COVERAGE",
            ClaimError::ClaimAlreadyExists(_) => "CLAIM_ALREADY_EXISTS",
            ClaimError::PolicyServiceUnavailable => "POLICY_SERVICE_UNAVAILABLE",
            ClaimError::PaymentServiceUnavailable => "PAYMENT_SERVICE_UNAVAILABLE",
            ClaimError::ValidationFailed(_) => "CLAIM_VALIDATION_FAILED",
            ClaimError::ClaimNotFound(_) => "CLAIM_NOT_FOUND",
            ClaimError::FilingFailed(_) => "CLAIM_FILING_FAILED",
            ClaimError::Storage(_) => "CLAIM_LOOKUP_FAILED",
        }
    }
}

impl From<ClaimError> for PortError {
    fn from(error: ClaimError) -> Self {
        match error {
            ClaimError::ClaimNotFound(what) => PortError::not_found("Claim", what),
            ClaimError::ClaimAlreadyExists(_) => PortError::conflict(error.to_string()),
            ClaimError::PolicyServiceUnavailable | ClaimError::PaymentServiceUnavailable => {
                PortError::unavailable(error.to_string())
            }
            ClaimError::FilingFailed(source) | ClaimError::Storage(source) => source,
            e if e.kind() == ErrorKind::InternalFailure => PortError::internal(e.to_string()),
            other => PortError::validation(other.to_string()),
        }
    }
}
