//! Core Kernel - Foundational types shared by the insurance services
//!
//! This crate provides the building blocks used by every domain module:
//! - Strongly typed identifiers and reference-number generation
//! - The error taxonomy every service error maps onto
//! - Port infrastructure (`PortError`, `DomainPort`, breaker configuration)
//! - Contracts for the four peer services (product, policy, payment, claim)

pub mod error;
pub mod identifiers;
pub mod money;
pub mod peers;
pub mod ports;
pub mod reference;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{DomainError, ErrorKind, ValidationFailure};
pub use identifiers::{ClaimId, PaymentId, PolicyId, ProductId};
pub use money::is_storable_amount;
pub use peers::{
    ClaimClient, ClaimView, FileClaimRequest, PaymentClient, PaymentMode, PaymentView, PolicyClient,
    PolicyView, ProductClient, ProductView,
};
pub use ports::{CircuitBreakerConfig, DomainPort, PortError};
pub use reference::ReferenceGenerator;
