//! Database Test Utilities
//!
//! Starts PostgreSQL in a container for repository integration tests and
//! applies the same migrations the server runs.

use std::sync::Arc;

use infra_db::{create_pool, DatabaseConfig, DatabasePool};
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

pub type TestDbError = Box<dyn std::error::Error + Send + Sync>;

/// Tables owned by the services, children first
const TABLES: [&str; 4] = ["claims", "payment_details", "policy_details", "products"];

/// A PostgreSQL container with a migrated schema
pub struct TestDatabase {
    _container: ContainerAsync<Postgres>,
    pub url: String,
    pub pool: DatabasePool,
}

impl TestDatabase {
    /// Starts a new container and runs the migrations against it
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or the schema
    /// cannot be applied
    pub async fn new() -> Result<Self, TestDbError> {
        let container = Postgres::default().start().await?;
        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(5432).await?;
        let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

        let config = DatabaseConfig::new(url.clone())
            .max_connections(5)
            .min_connections(1);
        let pool = create_pool(&config).await?;

        Ok(Self {
            _container: container,
            url,
            pool,
        })
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Clears all rows while preserving the schema
    pub async fn clear_data(&self) -> Result<(), TestDbError> {
        let statement = format!("TRUNCATE TABLE {} RESTART IDENTITY CASCADE", TABLES.join(", "));
        sqlx::query(&statement).execute(&self.pool).await?;
        Ok(())
    }
}

static SHARED_TEST_DB: OnceCell<Arc<TestDatabase>> = OnceCell::const_new();

/// Gets or creates a database shared by every test in the binary
///
/// Tests using it must call [`TestDatabase::clear_data`] first and must not
/// run concurrently with each other.
pub async fn shared_test_database() -> Result<Arc<TestDatabase>, TestDbError> {
    SHARED_TEST_DB
        .get_or_try_init(|| async { TestDatabase::new().await.map(Arc::new) })
        .await
        .cloned()
}
