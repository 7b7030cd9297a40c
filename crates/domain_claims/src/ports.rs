//! Claims Domain Ports

use async_trait::async_trait;
use core_kernel::{ClaimId, DomainPort, PolicyId, PortError};

use crate::claim::{Claim, NewClaim};

/// Local claim store
///
/// `insert` answers `PortError::Conflict` if the policy already has a claim;
/// the check and the write happen as one step.
#[async_trait]
pub trait ClaimRepository: DomainPort {
    async fn insert(&self, claim: NewClaim) -> Result<Claim, PortError>;

    async fn find_by_id(&self, id: ClaimId) -> Result<Option<Claim>, PortError>;

    /// Most recent claim filed against a policy
    async fn latest_for_policy(&self, policy_id: PolicyId) -> Result<Option<Claim>, PortError>;
}

/// In-memory repository, used when no database is configured and in tests
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    struct Store {
        next_id: i64,
        claims: BTreeMap<ClaimId, Claim>,
    }

    #[derive(Debug, Default, Clone)]
    pub struct InMemoryClaimRepository {
        store: Arc<RwLock<Store>>,
        fail_writes: Arc<AtomicBool>,
    }

    impl InMemoryClaimRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn len(&self) -> usize {
            self.store.read().await.claims.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.len().await == 0
        }

        /// Makes subsequent inserts fail, to exercise storage-error paths
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }
    }

    impl DomainPort for InMemoryClaimRepository {}

    #[async_trait]
    impl ClaimRepository for InMemoryClaimRepository {
        async fn insert(&self, claim: NewClaim) -> Result<Claim, PortError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PortError::internal("claim store rejected the write"));
            }
            let mut store = self.store.write().await;
            if store.claims.values().any(|c| c.policy_id == claim.policy_id) {
                return Err(PortError::conflict(format!(
                    "claim already filed for policy {}",
                    claim.policy_id
                )));
            }
            store.next_id += 1;
            let stored = claim.into_claim(ClaimId::new(store.next_id));
            store.claims.insert(stored.id, stored.clone());
            Ok(stored)
        }

        async fn find_by_id(&self, id: ClaimId) -> Result<Option<Claim>, PortError> {
            Ok(self.store.read().await.claims.get(&id).cloned())
        }

        async fn latest_for_policy(&self, policy_id: PolicyId) -> Result<Option<Claim>, PortError> {
            Ok(self
                .store
                .read()
                .await
                .claims
                .values()
                .filter(|c| c.policy_id == policy_id)
                .max_by_key(|c| (c.claim_date, c.id))
                .cloned())
        }
    }
}
