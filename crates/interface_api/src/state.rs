//! Service wiring
//!
//! Every service runs in this process. Each peer dependency is either the
//! local service itself or, when a URL is configured, an HTTP client; in
//! both cases it is wrapped in a circuit breaker so a failing peer degrades
//! the same way.

use std::sync::Arc;

use core_kernel::peers::{PAYMENT_SERVICE, POLICY_SERVICE, PRODUCT_SERVICE};
use core_kernel::ports::HealthCheckable;
use core_kernel::{PaymentClient, PolicyClient, PortError, ProductClient};
use domain_billing::ports::memory::InMemoryTransactionRepository;
use domain_billing::{PaymentService, TransactionRepository};
use domain_claims::ports::memory::InMemoryClaimRepository;
use domain_claims::{ClaimRepository, ClaimService};
use domain_policy::ports::memory::InMemoryPolicyRepository;
use domain_policy::{PolicyOrchestrator, PolicyRepository};
use domain_product::ports::memory::InMemoryProductRepository;
use domain_product::{ProductCatalog, ProductRepository};
use infra_cache::CacheLayer;
use infra_clients::{HttpPaymentClient, HttpPeer, HttpPolicyClient, HttpProductClient};
use infra_db::{
    create_pool, DatabaseError, DatabaseHealth, DatabasePool,
    PostgresClaimRepository, PostgresPolicyRepository, PostgresProductRepository,
    PostgresTransactionRepository,
};
use infra_resilience::Resilient;
use thiserror::Error;
use tracing::info;

use crate::config::ApiConfig;

/// Failure while assembling the application
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("invalid peer configuration: {0}")]
    Peer(#[from] PortError),
}

/// Storage behind each service
pub struct Repositories {
    pub products: Arc<dyn ProductRepository>,
    pub policies: Arc<dyn PolicyRepository>,
    pub payments: Arc<dyn TransactionRepository>,
    pub claims: Arc<dyn ClaimRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            products: Arc::new(InMemoryProductRepository::new()),
            policies: Arc::new(InMemoryPolicyRepository::new()),
            payments: Arc::new(InMemoryTransactionRepository::new()),
            claims: Arc::new(InMemoryClaimRepository::new()),
        }
    }

    pub fn postgres(pool: DatabasePool) -> Self {
        Self {
            products: Arc::new(PostgresProductRepository::new(pool.clone())),
            policies: Arc::new(PostgresPolicyRepository::new(pool.clone())),
            payments: Arc::new(PostgresTransactionRepository::new(pool.clone())),
            claims: Arc::new(PostgresClaimRepository::new(pool)),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductCatalog>,
    pub policies: Arc<PolicyOrchestrator>,
    pub payments: Arc<PaymentService>,
    pub claims: Arc<ClaimService>,
    /// Breakers and storage reported by the readiness check
    pub probes: Arc<Vec<Arc<dyn HealthCheckable>>>,
}

impl AppState {
    /// Wires the services, connecting to PostgreSQL if one is configured
    pub async fn from_config(config: &ApiConfig) -> Result<Self, StartupError> {
        let mut probes: Vec<Arc<dyn HealthCheckable>> = Vec::new();

        let repositories = match &config.database {
            Some(database) => {
                let pool = create_pool(database).await?;
                probes.push(Arc::new(DatabaseHealth::new(pool.clone())));
                Repositories::postgres(pool)
            }
            None => {
                info!("no database configured, using in-memory repositories");
                Repositories::in_memory()
            }
        };

        Self::assemble(config, repositories, probes)
    }

    /// Wires the services over the given repositories
    pub fn assemble(
        config: &ApiConfig,
        repositories: Repositories,
        mut probes: Vec<Arc<dyn HealthCheckable>>,
    ) -> Result<Self, StartupError> {
        let cache = CacheLayer::from_config(&config.cache);
        let breaker = &config.resilience;
        let timeout = config.peers.timeout();

        let products = Arc::new(ProductCatalog::new(repositories.products, cache.clone()));
        let product_peer: Arc<dyn ProductClient> = match &config.peers.product_url {
            Some(url) => {
                info!(url = %url, "product service is remote");
                Arc::new(HttpProductClient::new(HttpPeer::new(PRODUCT_SERVICE, url, timeout)?))
            }
            None => products.clone(),
        };
        let product_client = Arc::new(Resilient::new(PRODUCT_SERVICE, product_peer, breaker.clone()));
        probes.push(product_client.clone());

        let policies = Arc::new(PolicyOrchestrator::new(
            repositories.policies,
            product_client,
            cache.clone(),
        ));
        let policy_peer: Arc<dyn PolicyClient> = match &config.peers.policy_url {
            Some(url) => {
                info!(url = %url, "policy service is remote");
                Arc::new(HttpPolicyClient::new(HttpPeer::new(POLICY_SERVICE, url, timeout)?))
            }
            None => policies.clone(),
        };
        let policy_client = Arc::new(Resilient::new(POLICY_SERVICE, policy_peer, breaker.clone()));
        probes.push(policy_client.clone());

        let payments = Arc::new(PaymentService::new(repositories.payments));
        let payment_peer: Arc<dyn PaymentClient> = match &config.peers.payment_url {
            Some(url) => {
                info!(url = %url, "payment service is remote");
                Arc::new(HttpPaymentClient::new(HttpPeer::new(PAYMENT_SERVICE, url, timeout)?))
            }
            None => payments.clone(),
        };
        let payment_client = Arc::new(Resilient::new(PAYMENT_SERVICE, payment_peer, breaker.clone()));
        probes.push(payment_client.clone());

        let claims = Arc::new(ClaimService::new(
            repositories.claims,
            policy_client,
            payment_client,
            cache,
        ));

        Ok(Self {
            products,
            policies,
            payments,
            claims,
            probes: Arc::new(probes),
        })
    }
}
