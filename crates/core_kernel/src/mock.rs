//! Programmable peer stubs for testing
//!
//! Each stub answers from a table of views, can be switched to fail like an
//! unreachable peer or to hang forever, and counts the calls it received.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::identifiers::{ClaimId, PolicyId, ProductId};
use crate::peers::{
    ClaimClient, ClaimView, FileClaimRequest, PaymentClient, PaymentView, PolicyClient,
    PolicyView, ProductClient, ProductView, PAYMENT_SERVICE, POLICY_SERVICE, PRODUCT_SERVICE,
    CLAIM_SERVICE,
};
use crate::ports::{DomainPort, PortError};

/// How a stub reacts to the next calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StubBehavior {
    /// Answer from the table, `NotFound` on a miss
    #[default]
    Respond,
    /// Fail as if the peer refused the connection
    Unavailable,
    /// Never complete
    Hang,
}

#[derive(Debug)]
struct Scripted<V> {
    service: &'static str,
    entity: &'static str,
    entries: RwLock<HashMap<i64, V>>,
    behavior: RwLock<StubBehavior>,
    calls: AtomicUsize,
}

impl<V: Clone> Scripted<V> {
    fn new(service: &'static str, entity: &'static str) -> Self {
        Self {
            service,
            entity,
            entries: RwLock::new(HashMap::new()),
            behavior: RwLock::new(StubBehavior::Respond),
            calls: AtomicUsize::new(0),
        }
    }

    async fn answer(&self, key: i64) -> Result<V, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = *self.behavior.read().await;
        match behavior {
            StubBehavior::Respond => self
                .entries
                .read()
                .await
                .get(&key)
                .cloned()
                .ok_or_else(|| PortError::not_found(self.entity, key)),
            StubBehavior::Unavailable => Err(PortError::connection(format!(
                "{} refused the connection",
                self.service
            ))),
            StubBehavior::Hang => std::future::pending().await,
        }
    }
}

macro_rules! stub_controls {
    ($stub:ident, $view:ty) => {
        impl $stub {
            /// Switches how subsequent calls behave
            pub async fn set_behavior(&self, behavior: StubBehavior) {
                *self.inner.behavior.write().await = behavior;
            }

            /// Number of calls received so far
            pub fn calls(&self) -> usize {
                self.inner.calls.load(Ordering::SeqCst)
            }

            async fn store(&self, key: i64, view: $view) {
                self.inner.entries.write().await.insert(key, view);
            }
        }

        impl DomainPort for $stub {}
    };
}

/// Stub of the product service
#[derive(Debug)]
pub struct StubProductClient {
    inner: Scripted<ProductView>,
}

impl StubProductClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Scripted::new(PRODUCT_SERVICE, "Product"),
        })
    }

    pub async fn insert(&self, view: ProductView) {
        self.store(view.product_id.value(), view).await;
    }
}

stub_controls!(StubProductClient, ProductView);

#[async_trait]
impl ProductClient for StubProductClient {
    async fn validate_product(&self, product_id: ProductId) -> Result<(), PortError> {
        self.inner.answer(product_id.value()).await.map(|_| ())
    }

    async fn get_product(&self, product_id: ProductId) -> Result<ProductView, PortError> {
        self.inner.answer(product_id.value()).await
    }
}

/// Stub of the policy service
#[derive(Debug)]
pub struct StubPolicyClient {
    inner: Scripted<PolicyView>,
}

impl StubPolicyClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Scripted::new(POLICY_SERVICE, "Policy"),
        })
    }

    pub async fn insert(&self, view: PolicyView) {
        self.store(view.policy_id.value(), view).await;
    }
}

stub_controls!(StubPolicyClient, PolicyView);

#[async_trait]
impl PolicyClient for StubPolicyClient {
    async fn get_policy(&self, policy_id: PolicyId) -> Result<PolicyView, PortError> {
        self.inner.answer(policy_id.value()).await
    }
}

/// Stub of the payment service, keyed by policy id
#[derive(Debug)]
pub struct StubPaymentClient {
    inner: Scripted<PaymentView>,
}

impl StubPaymentClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Scripted::new(PAYMENT_SERVICE, "Payment"),
        })
    }

    pub async fn insert(&self, view: PaymentView) {
        self.store(view.policy_id.value(), view).await;
    }
}

stub_controls!(StubPaymentClient, PaymentView);

#[async_trait]
impl PaymentClient for StubPaymentClient {
    async fn payment_by_policy(&self, policy_id: PolicyId) -> Result<PaymentView, PortError> {
        self.inner.answer(policy_id.value()).await
    }
}

/// Stub of the claim service, keyed by policy id
#[derive(Debug)]
pub struct StubClaimClient {
    inner: Scripted<ClaimView>,
    filed: RwLock<Vec<FileClaimRequest>>,
    next_id: AtomicI64,
}

impl StubClaimClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Scripted::new(CLAIM_SERVICE, "Claim"),
            filed: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        })
    }

    pub async fn insert(&self, view: ClaimView) {
        self.store(view.policy_id.value(), view).await;
    }

    /// Requests accepted by `file_claim`, in arrival order
    pub async fn filed(&self) -> Vec<FileClaimRequest> {
        self.filed.read().await.clone()
    }
}

stub_controls!(StubClaimClient, ClaimView);

#[async_trait]
impl ClaimClient for StubClaimClient {
    async fn file_claim(&self, request: &FileClaimRequest) -> Result<ClaimId, PortError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        match *self.inner.behavior.read().await {
            StubBehavior::Respond => {
                self.filed.write().await.push(request.clone());
                Ok(ClaimId::new(self.next_id.fetch_add(1, Ordering::SeqCst)))
            }
            StubBehavior::Unavailable => Err(PortError::connection("claim-service refused the connection")),
            StubBehavior::Hang => std::future::pending().await,
        }
    }

    async fn claim_by_policy(&self, policy_id: PolicyId) -> Result<ClaimView, PortError> {
        self.inner.answer(policy_id.value()).await
    }
}
