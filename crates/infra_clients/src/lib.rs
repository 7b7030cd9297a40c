//! HTTP adapters for the peer services
//!
//! Each adapter implements one of the `core_kernel` client contracts over
//! JSON/HTTP. Non-success statuses are decoded from the shared error
//! envelope and mapped onto `PortError`:
//!
//! - 404 -> `PortError::NotFound`
//! - 400/403/422 -> `PortError::Validation`
//! - 401 -> `PortError::Unauthorized`
//! - 409 -> `PortError::Conflict`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - timeouts -> `PortError::Timeout`, refused connections -> `PortError::Connection`
//!
//! The adapters do not retry or trip circuits themselves; wrap them in
//! `infra_resilience::Resilient` for that.

pub mod clients;
pub mod peer;

pub use clients::{HttpClaimClient, HttpPaymentClient, HttpPolicyClient, HttpProductClient};
pub use peer::{map_status, HttpPeer, Subject};
