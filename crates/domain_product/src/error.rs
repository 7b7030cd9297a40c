//! Product domain errors

use core_kernel::{DomainError, ErrorKind, PortError, ProductId, ValidationFailure};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error(transparent)]
    Invalid(#[from] ValidationFailure),

    #[error("Product not found with ID: {0}")]
    NotFound(ProductId),

    #[error("Product with name '{name}' and type '{product_type}' already exists")]
    Duplicate { name: String, product_type: String },

    #[error("Product storage failed: {0}")]
    Storage(PortError),
}

impl DomainError for ProductError {
    fn kind(&self) -> ErrorKind {
        match self {
            ProductError::Invalid(_) => ErrorKind::InvalidRequest,
            ProductError::NotFound(_) => ErrorKind::NotFound,
            ProductError::Duplicate { .. } => ErrorKind::Conflict,
            ProductError::Storage(_) => ErrorKind::InternalFailure,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ProductError::Invalid(failure) => failure.code,
            ProductError::NotFound(_) => "PRODUCT_NOT_FOUND",
            ProductError::Duplicate { .. } => "DUPLICATE_PRODUCT",
            ProductError::Storage(_) => "PRODUCT_STORAGE_FAILED",
        }
    }
}

impl From<ProductError> for PortError {
    fn from(error: ProductError) -> Self {
        match error {
            ProductError::NotFound(id) => PortError::not_found("Product", id),
            ProductError::Invalid(failure) => PortError::validation(failure.message),
            ProductError::Duplicate { .. } => PortError::conflict(error.to_string()),
            ProductError::Storage(source) => source,
        }
    }
}
