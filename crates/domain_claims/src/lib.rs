//! Claims Domain
//!
//! Files claims against issued policies and serves claim reads. A claim is
//! only written after the validation pipeline has confirmed, in order:
//!
//! ```text
//! syntax -> policy in force -> customer owns policy -> premium paid
//!        -> amount within coverage -> no earlier claim -> persist
//! ```
//!
//! The policy and payment lookups go to peer services through
//! [`core_kernel::PolicyClient`] and [`core_kernel::PaymentClient`]; the
//! duplicate check and the write use the local [`ClaimRepository`].

pub mod claim;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod service;
pub mod validation;

pub use claim::{Claim, ClaimStatus, ClaimStatusView, NewClaim};
pub use error::ClaimError;
pub use pipeline::{ClaimCheck, ClaimValidationPipeline, ValidatedClaim};
pub use ports::ClaimRepository;
pub use service::ClaimService;
