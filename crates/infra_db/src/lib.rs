//! Infrastructure Database Layer
//!
//! PostgreSQL implementations of the domain repository ports, built on SQLx.
//! Each service owns its tables; nothing here joins across them.
//!
//! Uniqueness the domains rely on (one payment and one claim per policy, one
//! product per name and type) is enforced with unique indexes, and a
//! violation comes back as `PortError::Conflict`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PostgresClaimRepository};
//!
//! let pool = create_pool(&DatabaseConfig::new("postgres://localhost/insurance")).await?;
//! let claims = PostgresClaimRepository::new(pool);
//! ```

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DatabaseError;
pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabaseHealth, DatabasePool};
pub use repositories::{
    PostgresClaimRepository, PostgresPolicyRepository, PostgresProductRepository,
    PostgresTransactionRepository,
};
