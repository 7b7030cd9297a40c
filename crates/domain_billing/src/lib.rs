//! Billing Domain - Payment processing
//!
//! Records premium and claim payments against policies, at most one per
//! policy, and answers payment lookups for the claim pipeline through the
//! [`core_kernel::PaymentClient`] contract.

pub mod error;
pub mod events;
pub mod ports;
pub mod service;
pub mod transaction;
pub mod validation;

pub use error::PaymentError;
pub use events::{PaymentEvent, PaymentEventPublisher, TracingEventPublisher};
pub use ports::TransactionRepository;
pub use service::PaymentService;
pub use validation::ValidatedPayment;
pub use transaction::{NewTransaction, PaymentRequest, PaymentStatus, PaymentType, Transaction};
