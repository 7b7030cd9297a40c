//! Peer client contracts over HTTP

use async_trait::async_trait;
use core_kernel::{
    ClaimClient, ClaimId, ClaimView, DomainPort, FileClaimRequest, PaymentClient, PaymentView,
    PolicyClient, PolicyId, PolicyView, PortError, ProductClient, ProductId, ProductView,
};

use crate::peer::{HttpPeer, Subject};

/// Talks to the product service
#[derive(Debug, Clone)]
pub struct HttpProductClient {
    peer: HttpPeer,
}

impl HttpProductClient {
    pub fn new(peer: HttpPeer) -> Self {
        Self { peer }
    }
}

impl DomainPort for HttpProductClient {}

#[async_trait]
impl ProductClient for HttpProductClient {
    async fn validate_product(&self, product_id: ProductId) -> Result<(), PortError> {
        self.peer
            .post_empty(
                &format!("/product/validate/{}", product_id),
                Subject::new("Product", product_id.value()),
            )
            .await
    }

    async fn get_product(&self, product_id: ProductId) -> Result<ProductView, PortError> {
        self.peer
            .get_json(
                &format!("/product/{}", product_id),
                Subject::new("Product", product_id.value()),
            )
            .await
    }
}

/// Talks to the policy service
#[derive(Debug, Clone)]
pub struct HttpPolicyClient {
    peer: HttpPeer,
}

impl HttpPolicyClient {
    pub fn new(peer: HttpPeer) -> Self {
        Self { peer }
    }
}

impl DomainPort for HttpPolicyClient {}

#[async_trait]
impl PolicyClient for HttpPolicyClient {
    async fn get_policy(&self, policy_id: PolicyId) -> Result<PolicyView, PortError> {
        self.peer
            .get_json(
                &format!("/policy/{}", policy_id),
                Subject::new("Policy", policy_id.value()),
            )
            .await
    }
}

/// Talks to the payment service
#[derive(Debug, Clone)]
pub struct HttpPaymentClient {
    peer: HttpPeer,
}

impl HttpPaymentClient {
    pub fn new(peer: HttpPeer) -> Self {
        Self { peer }
    }
}

impl DomainPort for HttpPaymentClient {}

#[async_trait]
impl PaymentClient for HttpPaymentClient {
    async fn payment_by_policy(&self, policy_id: PolicyId) -> Result<PaymentView, PortError> {
        self.peer
            .get_json(
                &format!("/payment/policy/{}", policy_id),
                Subject::new("Payment", policy_id.value()),
            )
            .await
    }
}

/// Talks to the claim service
#[derive(Debug, Clone)]
pub struct HttpClaimClient {
    peer: HttpPeer,
}

impl HttpClaimClient {
    pub fn new(peer: HttpPeer) -> Self {
        Self { peer }
    }
}

impl DomainPort for HttpClaimClient {}

#[async_trait]
impl ClaimClient for HttpClaimClient {
    async fn file_claim(&self, request: &FileClaimRequest) -> Result<ClaimId, PortError> {
        // A 404 here means the policy named in the filing does not exist
        let id: ClaimId = self
            .peer
            .post_json("/claim", request, Subject::new("Policy", request.policy_id))
            .await?;
        tracing::debug!(claim_id = %id, policy_id = request.policy_id, "claim filed with peer");
        Ok(id)
    }

    async fn claim_by_policy(&self, policy_id: PolicyId) -> Result<ClaimView, PortError> {
        self.peer
            .get_json(
                &format!("/claim/policy/{}", policy_id),
                Subject::new("Claim", policy_id.value()),
            )
            .await
    }
}
