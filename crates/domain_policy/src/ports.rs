//! Policy Domain Ports

use async_trait::async_trait;
use core_kernel::{DomainPort, PolicyId, PortError};

use crate::policy::{NewPolicy, Policy};

/// Keyed store owned by the policy service
#[async_trait]
pub trait PolicyRepository: DomainPort {
    /// Stores a policy and assigns its id
    async fn insert(&self, policy: NewPolicy) -> Result<Policy, PortError>;

    async fn find_by_id(&self, id: PolicyId) -> Result<Option<Policy>, PortError>;
}

/// In-memory repository, used when no database is configured and in tests
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    struct Store {
        next_id: i64,
        policies: HashMap<PolicyId, Policy>,
    }

    #[derive(Debug, Default, Clone)]
    pub struct InMemoryPolicyRepository {
        store: Arc<RwLock<Store>>,
        fail_writes: Arc<AtomicBool>,
    }

    impl InMemoryPolicyRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of stored policies
        pub async fn len(&self) -> usize {
            self.store.read().await.policies.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.len().await == 0
        }

        /// Makes subsequent inserts fail, to exercise storage-error paths
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }
    }

    impl DomainPort for InMemoryPolicyRepository {}

    #[async_trait]
    impl PolicyRepository for InMemoryPolicyRepository {
        async fn insert(&self, policy: NewPolicy) -> Result<Policy, PortError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PortError::internal("policy store rejected the write"));
            }
            let mut store = self.store.write().await;
            store.next_id += 1;
            let stored = policy.into_policy(PolicyId::new(store.next_id));
            store.policies.insert(stored.id, stored.clone());
            Ok(stored)
        }

        async fn find_by_id(&self, id: PolicyId) -> Result<Option<Policy>, PortError> {
            Ok(self.store.read().await.policies.get(&id).cloned())
        }
    }
}
