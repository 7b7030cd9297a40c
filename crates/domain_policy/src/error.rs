//! Policy domain errors
//!
//! This module defines all error types that can occur while issuing or
//! reading policies.

use core_kernel::{DomainError, ErrorKind, PolicyId, PortError, ProductId, ValidationFailure};
use thiserror::Error;

/// Errors that can occur in the policy domain
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A request field failed validation
    #[error(transparent)]
    Invalid(#[from] ValidationFailure),

    /// The product service does not know the product
    #[error("Product not found with ID: {0}")]
    ProductNotFound(ProductId),

    /// The product exists but is closed for new business
    #[error("Product {0} is not active")]
    ProductInactive(ProductId),

    /// The product service could not be reached or its circuit is open
    #[error("Product Service is not available")]
    ProductServiceUnavailable,

    /// The product service answered in a way we could not use
    #[error("Product validation failed: {0}")]
    ProductValidationFailed(String),

    #[error("Policy not found with ID: {0}")]
    PolicyNotFound(PolicyId),

    /// Repository failure
    #[error("Policy storage failed: {0}")]
    Storage(PortError),
}

impl PolicyError {
    /// Classifies a failed product-service call
    pub fn from_product_call(product_id: ProductId, error: PortError) -> Self {
        match error {
            PortError::NotFound { .. } => PolicyError::ProductNotFound(product_id),
            e if e.is_transient() => PolicyError::ProductServiceUnavailable,
            other => PolicyError::ProductValidationFailed(other.to_string()),
        }
    }
}

impl DomainError for PolicyError {
    fn kind(&self) -> ErrorKind {
        match self {
            PolicyError::Invalid(_) | PolicyError::ProductInactive(_) => ErrorKind::InvalidRequest,
            PolicyError::ProductNotFound(_) | PolicyError::PolicyNotFound(_) => ErrorKind::NotFound,
            PolicyError::ProductServiceUnavailable => ErrorKind::DependencyUnavailable,
            PolicyError::ProductValidationFailed(_) | PolicyError::Storage(_) => {
                ErrorKind::InternalFailure
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            PolicyError::Invalid(failure) => failure.code,
            PolicyError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            PolicyError::ProductInactive(_) => "PRODUCT_INACTIVE",
            PolicyError::ProductServiceUnavailable => "PRODUCT_SERVICE_UNAVAILABLE",
            PolicyError::ProductValidationFailed(_) => "PRODUCT_VALIDATION_ERROR",
            PolicyError::PolicyNotFound(_) => "POLICY_NOT_FOUND",
            PolicyError::Storage(_) => "POLICY_STORAGE_FAILED",
        }
    }
}

impl From<PolicyError> for PortError {
    fn from(error: PolicyError) -> Self {
        match error {
            PolicyError::PolicyNotFound(id) => PortError::not_found("Policy", id),
            PolicyError::Invalid(failure) => PortError::validation(failure.message),
            PolicyError::Storage(source) => source,
            other => PortError::internal(other.to_string()),
        }
    }
}
