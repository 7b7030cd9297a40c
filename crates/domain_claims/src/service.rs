//! Claim filing and claim reads

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use core_kernel::{
    ClaimClient, ClaimId, ClaimView, DomainPort, FileClaimRequest, PaymentClient, PolicyClient,
    PolicyId, PortError, ReferenceGenerator,
};
use infra_cache::{regions, CacheLayer};

use crate::claim::{Claim, ClaimStatusView, NewClaim};
use crate::error::ClaimError;
use crate::pipeline::ClaimValidationPipeline;
use crate::ports::ClaimRepository;
use crate::validation::{validate_claim_id, validate_policy_id};

pub struct ClaimService {
    repository: Arc<dyn ClaimRepository>,
    pipeline: ClaimValidationPipeline,
    cache: CacheLayer,
    numbers: ReferenceGenerator,
}

impl ClaimService {
    /// Creates a claim service
    ///
    /// # Arguments
    ///
    /// * `repository` - Local claim store
    /// * `policies` / `payments` - Peer clients, normally wrapped in circuit breakers
    /// * `cache` - Shared cache layer
    pub fn new(
        repository: Arc<dyn ClaimRepository>,
        policies: Arc<dyn PolicyClient>,
        payments: Arc<dyn PaymentClient>,
        cache: CacheLayer,
    ) -> Self {
        let pipeline = ClaimValidationPipeline::new(policies, payments, repository.clone());
        Self {
            repository,
            pipeline,
            cache,
            numbers: ReferenceGenerator::new("CLM"),
        }
    }

    pub fn pipeline(&self) -> &ClaimValidationPipeline {
        &self.pipeline
    }

    /// Files a claim
    ///
    /// Runs the validation pipeline, stores the claim as PENDING with a fresh
    /// `CLM-` number and evicts the `claims` and `claim-status` regions.
    ///
    /// # Errors
    ///
    /// Any pipeline refusal, `ClaimAlreadyExists` if a concurrent filing for
    /// the same policy was stored first, or `FilingFailed` on storage failure.
    pub async fn file_claim(&self, request: &FileClaimRequest) -> Result<ClaimId, ClaimError> {
        let validated = self.pipeline.validate(request).await?;
        let filing = validated.filing;
        let policy_id = filing.policy_id;

        let claim = NewClaim {
            claim_number: self.numbers.next(),
            policy_id,
            customer_id: filing.customer_id,
            claim_type: filing.claim_type,
            claim_amount: filing.claim_amount,
            description: filing.description,
            filed_at: Utc::now(),
        };

        let stored = self.repository.insert(claim).await.map_err(|e| {
            if e.is_conflict() {
                ClaimError::ClaimAlreadyExists(policy_id)
            } else {
                tracing::error!(policy_id = %policy_id, error = %e, "failed to store claim");
                ClaimError::FilingFailed(e)
            }
        })?;

        self.cache.invalidate(&[regions::CLAIMS, regions::CLAIM_STATUS]);

        tracing::info!(
            claim_id = %stored.id,
            claim_number = %stored.claim_number,
            policy_id = %policy_id,
            amount = %stored.claim_amount,
            transaction_id = %validated.payment.transaction_id,
            "claim filed"
        );
        Ok(stored.id)
    }

    /// Most recent claim filed against a policy
    pub async fn claim_by_policy_id(&self, policy_id: PolicyId) -> Result<ClaimView, ClaimError> {
        let policy_id = validate_policy_id(policy_id)?;
        let key = format!("policy-{}", policy_id);
        self.cache
            .read_through(regions::CLAIMS, &key, || async {
                self.repository
                    .latest_for_policy(policy_id)
                    .await
                    .map_err(ClaimError::Storage)?
                    .map(|claim| ClaimView::from(&claim))
                    .ok_or_else(|| ClaimError::ClaimNotFound(format!("policy ID: {}", policy_id)))
            })
            .await
    }

    pub async fn claim_by_id(&self, claim_id: ClaimId) -> Result<ClaimView, ClaimError> {
        let claim_id = validate_claim_id(claim_id)?;
        let key = format!("claim-{}", claim_id);
        self.cache
            .read_through(regions::CLAIMS, &key, || async {
                self.load(claim_id).await.map(|claim| ClaimView::from(&claim))
            })
            .await
    }

    pub async fn claim_status(&self, claim_id: ClaimId) -> Result<ClaimStatusView, ClaimError> {
        let claim_id = validate_claim_id(claim_id)?;
        let key = format!("claim-{}", claim_id);
        self.cache
            .read_through(regions::CLAIM_STATUS, &key, || async {
                self.load(claim_id).await.map(|claim| ClaimStatusView::from(&claim))
            })
            .await
    }

    async fn load(&self, claim_id: ClaimId) -> Result<Claim, ClaimError> {
        self.repository
            .find_by_id(claim_id)
            .await
            .map_err(ClaimError::Storage)?
            .ok_or_else(|| ClaimError::ClaimNotFound(format!("claim ID: {}", claim_id)))
    }
}

impl DomainPort for ClaimService {}

#[async_trait]
impl ClaimClient for ClaimService {
    async fn file_claim(&self, request: &FileClaimRequest) -> Result<ClaimId, PortError> {
        Ok(ClaimService::file_claim(self, request).await?)
    }

    async fn claim_by_policy(&self, policy_id: PolicyId) -> Result<ClaimView, PortError> {
        Ok(self.claim_by_policy_id(policy_id).await?)
    }
}
