//! Repository implementations for domain entities
//!
//! Every repository maps a `FromRow` row struct to its domain type.
//! Enumerations are stored as their upper-case text form and parsed back on
//! read; a value that no longer parses is reported as a transformation
//! error rather than silently defaulted.

pub mod billing;
pub mod claims;
pub mod policy;
pub mod product;

pub use billing::PostgresTransactionRepository;
pub use claims::PostgresClaimRepository;
pub use policy::PostgresPolicyRepository;
pub use product::PostgresProductRepository;

use core_kernel::PortError;

/// Parses a stored enumeration column
pub(crate) fn parse_column<T>(column: &str, value: &str) -> Result<T, PortError>
where
    T: std::str::FromStr<Err = String>,
{
    value.parse().map_err(|e: String| PortError::Transformation {
        message: format!("column {}: {}", column, e),
    })
}
