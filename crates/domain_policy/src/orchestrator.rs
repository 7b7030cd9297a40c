//! Policy Orchestrator
//!
//! Issuance is a sequence of hard gates: nothing is written until the
//! request is valid and the product service has confirmed the product exists
//! and is active.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use core_kernel::{
    DomainPort, PolicyClient, PolicyId, PolicyView, PortError, ProductClient, ProductId,
    ReferenceGenerator,
};
use infra_cache::{regions, CacheLayer};

use crate::error::PolicyError;
use crate::policy::{
    IssuePolicyRequest, NewPolicy, Policy, PolicyDetails, PolicyStatus, ProductDetails,
};
use crate::ports::PolicyRepository;
use crate::validation::{validate_issue_request, validate_policy_id};

/// Issues policies and serves enriched policy reads
pub struct PolicyOrchestrator {
    repository: Arc<dyn PolicyRepository>,
    products: Arc<dyn ProductClient>,
    cache: CacheLayer,
    numbers: ReferenceGenerator,
}

impl PolicyOrchestrator {
    /// Creates an orchestrator
    ///
    /// # Arguments
    ///
    /// * `repository` - Store for issued policies
    /// * `products` - Product service client, normally wrapped in a circuit breaker
    /// * `cache` - Shared cache layer
    pub fn new(
        repository: Arc<dyn PolicyRepository>,
        products: Arc<dyn ProductClient>,
        cache: CacheLayer,
    ) -> Self {
        Self {
            repository,
            products,
            cache,
            numbers: ReferenceGenerator::new("POL"),
        }
    }

    /// Issues a policy
    ///
    /// 1. Validates the request
    /// 2. Confirms the product exists with the product service
    /// 3. Fetches the product and rejects it if inactive
    /// 4. Stores the policy as ACTIVE with a fresh `POL-` number
    /// 5. Evicts the `policies` and `policy-products` cache regions
    ///
    /// # Errors
    ///
    /// * `Invalid` - a field failed validation
    /// * `ProductNotFound` / `ProductInactive` - the product cannot be sold
    /// * `ProductServiceUnavailable` - the product service is unreachable or its circuit is open
    /// * `Storage` - the policy could not be stored
    pub async fn issue_policy(&self, request: &IssuePolicyRequest) -> Result<PolicyId, PolicyError> {
        let terms = validate_issue_request(request)?;
        let product_id = terms.product_id;

        self.products
            .validate_product(product_id)
            .await
            .map_err(|e| PolicyError::from_product_call(product_id, e))?;

        let product = self
            .products
            .get_product(product_id)
            .await
            .map_err(|e| PolicyError::from_product_call(product_id, e))?;

        if !product.active {
            tracing::info!(product_id = %product_id, "issuance rejected: product inactive");
            return Err(PolicyError::ProductInactive(product_id));
        }

        let policy = NewPolicy {
            policy_number: self.numbers.next(),
            terms,
            status: PolicyStatus::Active,
            issued_at: Utc::now(),
        };

        let stored = self.repository.insert(policy).await.map_err(|e| {
            tracing::error!(product_id = %product_id, error = %e, "failed to store policy");
            PolicyError::Storage(e)
        })?;

        self.cache
            .invalidate(&[regions::POLICIES, regions::POLICY_PRODUCTS]);

        tracing::info!(
            policy_id = %stored.id,
            policy_number = %stored.policy_number,
            customer_id = stored.customer_id,
            product = %product.product_name,
            "policy issued"
        );
        Ok(stored.id)
    }

    /// Returns the policy with product, payment and claim sub-views
    ///
    /// The policy record is read through the `policies` region and the
    /// product sub-view through `policy-products`. If the product service
    /// cannot answer, a `Product-<id>` placeholder is returned instead and
    /// nothing about the product is cached. Payment and claim sub-views are
    /// always placeholders.
    pub async fn get_policy_details(&self, policy_id: PolicyId) -> Result<PolicyDetails, PolicyError> {
        let policy_id = validate_policy_id(policy_id)?;
        let policy = self.load_policy(policy_id).await?;
        let product = self.product_details(policy.product_id).await;
        Ok(PolicyDetails::new(&policy, product))
    }

    async fn load_policy(&self, policy_id: PolicyId) -> Result<Policy, PolicyError> {
        let key = format!("policy-by-id:{}", policy_id);
        self.cache
            .read_through(regions::POLICIES, &key, || async {
                self.repository
                    .find_by_id(policy_id)
                    .await
                    .map_err(PolicyError::Storage)?
                    .ok_or(PolicyError::PolicyNotFound(policy_id))
            })
            .await
    }

    async fn product_details(&self, product_id: ProductId) -> ProductDetails {
        let key = format!("product-{}", product_id);
        let fetched = self
            .cache
            .read_through(regions::POLICY_PRODUCTS, &key, || async {
                self.products
                    .get_product(product_id)
                    .await
                    .map(ProductDetails::from)
            })
            .await;

        fetched.unwrap_or_else(|e| {
            tracing::warn!(product_id = %product_id, error = %e, "product enrichment unavailable, using placeholder");
            ProductDetails::placeholder(product_id)
        })
    }
}

impl DomainPort for PolicyOrchestrator {}

#[async_trait]
impl PolicyClient for PolicyOrchestrator {
    async fn get_policy(&self, policy_id: PolicyId) -> Result<PolicyView, PortError> {
        let details = self.get_policy_details(policy_id).await?;
        Ok(PolicyView::from(&details))
    }
}
