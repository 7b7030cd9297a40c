//! Policy Domain - Issuance and enriched reads
//!
//! This crate implements the Policy Orchestrator:
//! - `issue_policy` validates the request, confirms the product with the
//!   product service, stores the policy and evicts the policy caches
//! - `get_policy_details` reads a policy through the cache and decorates it
//!   with product, payment and claim sub-views
//!
//! The orchestrator also implements [`core_kernel::PolicyClient`] so other
//! services can be wired to it in-process.

pub mod error;
pub mod orchestrator;
pub mod policy;
pub mod ports;
pub mod validation;

pub use error::PolicyError;
pub use orchestrator::PolicyOrchestrator;
pub use policy::{
    ClaimDetails, IssuePolicyRequest, NewPolicy, PaymentDetails, Policy, PolicyDetails,
    PolicyStatus, PolicyTerms, ProductDetails,
};
pub use ports::PolicyRepository;
