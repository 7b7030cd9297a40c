//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! insurance services test suite.
//!
//! # Modules
//!
//! - `fixtures`: Ready-made requests for every service
//! - `builders`: Builders for the peer views fed to stubs
//! - `database`: PostgreSQL test containers
//! - `assertions`: Assertions on domain error codes and kinds
//! - `generators`: Property-based and fake data generators
//! - `harness`: Every service wired in-process, with switchable peer outages

pub mod assertions;
pub mod builders;
pub mod database;
pub mod fixtures;
pub mod generators;
pub mod harness;

pub use assertions::*;
pub use builders::*;
pub use database::*;
pub use fixtures::*;
pub use generators::*;
pub use harness::{PeerSwitch, TestHarness};
