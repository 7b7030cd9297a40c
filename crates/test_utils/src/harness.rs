//! End-to-end harness
//!
//! Wires the four services in one process the way the API does, with each
//! peer link behind a [`PeerSwitch`] so a test can take a service "down"
//! and watch the breakers react.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use core_kernel::peers::{PAYMENT_SERVICE, POLICY_SERVICE, PRODUCT_SERVICE};
use core_kernel::{
    CircuitBreakerConfig, DomainPort, PaymentClient, PaymentView, PolicyClient, PolicyId,
    PolicyView, PortError, ProductClient, ProductId, ProductView,
};
use domain_billing::ports::memory::InMemoryTransactionRepository;
use domain_billing::PaymentService;
use domain_claims::ports::memory::InMemoryClaimRepository;
use domain_claims::ClaimService;
use domain_policy::ports::memory::InMemoryPolicyRepository;
use domain_policy::PolicyOrchestrator;
use domain_product::ports::memory::InMemoryProductRepository;
use domain_product::{ProductCatalog, ProductError};
use infra_cache::{CacheLayer, InMemoryCacheStore};
use infra_resilience::{CircuitBreaker, Resilient};

use crate::fixtures::RequestFixtures;

/// Peer link that can be cut
///
/// While down every call fails with a connection error before reaching the
/// wrapped service.
pub struct PeerSwitch<C: ?Sized> {
    inner: Arc<C>,
    down: AtomicBool,
}

impl<C: ?Sized> PeerSwitch<C> {
    pub fn new(inner: Arc<C>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            down: AtomicBool::new(false),
        })
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn is_down(&self) -> bool {
        self.down.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), PortError> {
        if self.is_down() {
            return Err(PortError::connection("connection refused"));
        }
        Ok(())
    }
}

impl<C: ?Sized + Send + Sync + 'static> DomainPort for PeerSwitch<C> {}

#[async_trait]
impl<C: ?Sized + ProductClient> ProductClient for PeerSwitch<C> {
    async fn validate_product(&self, product_id: ProductId) -> Result<(), PortError> {
        self.check()?;
        self.inner.validate_product(product_id).await
    }

    async fn get_product(&self, product_id: ProductId) -> Result<ProductView, PortError> {
        self.check()?;
        self.inner.get_product(product_id).await
    }
}

#[async_trait]
impl<C: ?Sized + PolicyClient> PolicyClient for PeerSwitch<C> {
    async fn get_policy(&self, policy_id: PolicyId) -> Result<PolicyView, PortError> {
        self.check()?;
        self.inner.get_policy(policy_id).await
    }
}

#[async_trait]
impl<C: ?Sized + PaymentClient> PaymentClient for PeerSwitch<C> {
    async fn payment_by_policy(&self, policy_id: PolicyId) -> Result<PaymentView, PortError> {
        self.check()?;
        self.inner.payment_by_policy(policy_id).await
    }
}

/// The four services wired together over in-memory storage
pub struct TestHarness {
    pub cache: Arc<InMemoryCacheStore>,
    pub products: Arc<ProductCatalog>,
    pub policies: Arc<PolicyOrchestrator>,
    pub payments: Arc<PaymentService>,
    pub claims: Arc<ClaimService>,
    pub product_link: Arc<PeerSwitch<ProductCatalog>>,
    pub policy_link: Arc<PeerSwitch<PolicyOrchestrator>>,
    pub payment_link: Arc<PeerSwitch<PaymentService>>,
    pub product_breaker: Arc<CircuitBreaker>,
    pub policy_breaker: Arc<CircuitBreaker>,
    pub payment_breaker: Arc<CircuitBreaker>,
    product_seq: AtomicU32,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(CircuitBreakerConfig::default())
    }

    pub fn with_config(breaker: CircuitBreakerConfig) -> Self {
        let cache = Arc::new(InMemoryCacheStore::new());
        let layer = CacheLayer::new(cache.clone());

        let products = Arc::new(ProductCatalog::new(
            Arc::new(InMemoryProductRepository::new()),
            layer.clone(),
        ));
        let product_link = PeerSwitch::new(products.clone());
        let product_client = Resilient::new(PRODUCT_SERVICE, product_link.clone(), breaker.clone());
        let product_breaker = product_client.breaker().clone();

        let policies = Arc::new(PolicyOrchestrator::new(
            Arc::new(InMemoryPolicyRepository::new()),
            Arc::new(product_client),
            layer.clone(),
        ));
        let policy_link = PeerSwitch::new(policies.clone());
        let policy_client = Resilient::new(POLICY_SERVICE, policy_link.clone(), breaker.clone());
        let policy_breaker = policy_client.breaker().clone();

        let payments = Arc::new(PaymentService::new(Arc::new(
            InMemoryTransactionRepository::new(),
        )));
        let payment_link = PeerSwitch::new(payments.clone());
        let payment_client = Resilient::new(PAYMENT_SERVICE, payment_link.clone(), breaker);
        let payment_breaker = payment_client.breaker().clone();

        let claims = Arc::new(ClaimService::new(
            Arc::new(InMemoryClaimRepository::new()),
            Arc::new(policy_client),
            Arc::new(payment_client),
            layer,
        ));

        Self {
            cache,
            products,
            policies,
            payments,
            claims,
            product_link,
            policy_link,
            payment_link,
            product_breaker,
            policy_breaker,
            payment_breaker,
            product_seq: AtomicU32::new(0),
        }
    }

    /// Adds an active product with a unique name
    pub async fn active_product(&self) -> Result<ProductId, ProductError> {
        let mut request = RequestFixtures::product();
        let seq = self.product_seq.fetch_add(1, Ordering::SeqCst);
        request.product_name = format!("{} {}", request.product_name, seq);
        self.products.add_product(&request).await
    }

    /// Issues an in-force policy on a fresh active product
    pub async fn issued_policy(&self) -> anyhow::Result<PolicyId> {
        let product_id = self.active_product().await?;
        let policy_id = self
            .policies
            .issue_policy(&RequestFixtures::issue_policy(product_id))
            .await?;
        Ok(policy_id)
    }

    /// Issues a policy and records its premium payment for `customer_id`
    pub async fn paid_policy(&self, customer_id: &str) -> anyhow::Result<PolicyId> {
        let policy_id = self.issued_policy().await?;
        self.payments
            .process_payment(&RequestFixtures::payment(policy_id, customer_id))
            .await?;
        Ok(policy_id)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
