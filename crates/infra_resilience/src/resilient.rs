//! Decorator that guards a peer client with a breaker and a fallback

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use core_kernel::peers::{
    ClaimClient, ClaimView, FileClaimRequest, PaymentClient, PaymentView, PolicyClient,
    PolicyView, ProductClient, ProductView,
};
use core_kernel::ports::{AdapterHealth, HealthCheckResult, HealthCheckable};
use core_kernel::{CircuitBreakerConfig, ClaimId, DomainPort, PolicyId, PortError, ProductId};

use crate::breaker::{CircuitBreaker, CircuitState};
use crate::fallback::{FallbackHandler, UnavailableFallback};

/// Guarded client
///
/// Implements every peer client trait its inner client implements, so a
/// `Resilient<dyn PolicyClient>` can stand wherever an `Arc<dyn PolicyClient>`
/// is expected.
pub struct Resilient<C: ?Sized> {
    inner: Arc<C>,
    breaker: Arc<CircuitBreaker>,
    fallback: Arc<dyn FallbackHandler>,
}

impl<C: ?Sized + Send + Sync + 'static> Resilient<C> {
    /// Wraps `inner` with a fresh breaker named after the peer service
    pub fn new(service: impl Into<String>, inner: Arc<C>, config: CircuitBreakerConfig) -> Self {
        Self {
            inner,
            breaker: Arc::new(CircuitBreaker::new(service, config)),
            fallback: Arc::new(UnavailableFallback),
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackHandler>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    async fn guarded<T, F, Fut>(&self, operation: &'static str, f: F) -> Result<T, PortError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, PortError>>,
    {
        self.breaker
            .call(operation, f)
            .await
            .map_err(|e| self.fallback.recover(self.breaker.name(), operation, e))
    }
}

impl<C: ?Sized + Send + Sync + 'static> DomainPort for Resilient<C> {}

#[async_trait]
impl<C: ?Sized + ProductClient> ProductClient for Resilient<C> {
    async fn validate_product(&self, product_id: ProductId) -> Result<(), PortError> {
        let inner = &self.inner;
        self.guarded("validate_product", || inner.validate_product(product_id))
            .await
    }

    async fn get_product(&self, product_id: ProductId) -> Result<ProductView, PortError> {
        let inner = &self.inner;
        self.guarded("get_product", || inner.get_product(product_id)).await
    }
}

#[async_trait]
impl<C: ?Sized + PolicyClient> PolicyClient for Resilient<C> {
    async fn get_policy(&self, policy_id: PolicyId) -> Result<PolicyView, PortError> {
        let inner = &self.inner;
        self.guarded("get_policy", || inner.get_policy(policy_id)).await
    }
}

#[async_trait]
impl<C: ?Sized + PaymentClient> PaymentClient for Resilient<C> {
    async fn payment_by_policy(&self, policy_id: PolicyId) -> Result<PaymentView, PortError> {
        let inner = &self.inner;
        self.guarded("payment_by_policy", || inner.payment_by_policy(policy_id))
            .await
    }
}

#[async_trait]
impl<C: ?Sized + ClaimClient> ClaimClient for Resilient<C> {
    async fn file_claim(&self, request: &FileClaimRequest) -> Result<ClaimId, PortError> {
        let inner = &self.inner;
        self.guarded("file_claim", || inner.file_claim(request)).await
    }

    async fn claim_by_policy(&self, policy_id: PolicyId) -> Result<ClaimView, PortError> {
        let inner = &self.inner;
        self.guarded("claim_by_policy", || inner.claim_by_policy(policy_id))
            .await
    }
}

#[async_trait]
impl<C: ?Sized + Send + Sync + 'static> HealthCheckable for Resilient<C> {
    async fn health_check(&self) -> HealthCheckResult {
        let snapshot = self.breaker.snapshot();
        let (status, message) = match snapshot.state {
            CircuitState::Closed => (AdapterHealth::Healthy, None),
            CircuitState::HalfOpen => (
                AdapterHealth::Degraded,
                Some("circuit half-open, probing peer".to_string()),
            ),
            CircuitState::Open => (
                AdapterHealth::Unhealthy,
                Some(format!(
                    "circuit open after {} consecutive failures",
                    snapshot.consecutive_failures
                )),
            ),
        };
        HealthCheckResult {
            adapter_id: snapshot.name,
            status,
            message,
            checked_at: Utc::now(),
        }
    }
}
