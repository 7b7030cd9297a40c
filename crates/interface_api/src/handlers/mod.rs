//! Request handlers, one module per service

pub mod claims;
pub mod health;
pub mod payment;
pub mod policy;
pub mod product;

use crate::error::ApiError;

/// Fallback for unknown routes
pub async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}
