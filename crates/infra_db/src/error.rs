//! Database error types
//!
//! Repositories classify every `sqlx` failure into a [`DatabaseError`] and
//! hand it to the domain as a [`PortError`].

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Check or foreign key constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value could not be mapped back to a domain type
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_) | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

/// Maps a SQLx error to the matching variant using the PostgreSQL error code
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolClosed => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DatabaseError::SerializationError(error.to_string())
            }
            sqlx::Error::Database(db_err) => classify(
                db_err.code().as_deref(),
                db_err.constraint(),
                db_err.message().to_string(),
            ),
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

/// Unique indexes that enforce a one-per-key business rule
///
/// A violation of any other unique constraint (generated policy, transaction
/// or claim numbers) is a storage fault, not a duplicate request.
pub const BUSINESS_KEYS: [&str; 3] = [
    "products_name_type_key",
    "payment_details_policy_key",
    "claims_policy_key",
];

/// Classifies a PostgreSQL error by SQLSTATE and violated constraint
///
/// See <https://www.postgresql.org/docs/current/errcodes-appendix.html>.
pub fn classify(code: Option<&str>, constraint: Option<&str>, message: String) -> DatabaseError {
    match code {
        Some("23505") => match constraint {
            Some(key) if BUSINESS_KEYS.contains(&key) => DatabaseError::DuplicateEntry(message),
            other => DatabaseError::QueryFailed(format!(
                "unique constraint {} violated: {}",
                other.unwrap_or("<unnamed>"),
                message
            )),
        },
        Some("23503") | Some("23514") => DatabaseError::ConstraintViolation(message),
        _ => DatabaseError::QueryFailed(message),
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(what) => PortError::NotFound {
                entity_type: "Record".to_string(),
                id: what,
            },
            DatabaseError::DuplicateEntry(message) => PortError::conflict(message),
            DatabaseError::ConstraintViolation(message) => PortError::validation(message),
            DatabaseError::SerializationError(message) => PortError::Transformation { message },
            e if e.is_connection_error() => PortError::Connection {
                message: e.to_string(),
                source: Some(Box::new(e)),
            },
            e => PortError::Internal {
                message: e.to_string(),
                source: Some(Box::new(e)),
            },
        }
    }
}

/// Shorthand used by the repositories
pub(crate) fn port_error(error: sqlx::Error) -> PortError {
    PortError::from(DatabaseError::from(error))
}
