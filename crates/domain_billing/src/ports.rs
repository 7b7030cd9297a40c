//! Billing Domain Ports

use async_trait::async_trait;
use core_kernel::{DomainPort, PolicyId, PortError};

use crate::transaction::{NewTransaction, Transaction};

/// Store of recorded payments
///
/// A policy has at most one payment. `insert` must perform the existence
/// check and the write as one step and answer `PortError::Conflict` when the
/// policy already has a payment.
#[async_trait]
pub trait TransactionRepository: DomainPort {
    async fn insert(&self, transaction: NewTransaction) -> Result<Transaction, PortError>;

    async fn find_by_policy_id(&self, policy_id: PolicyId) -> Result<Option<Transaction>, PortError>;

    /// Most recent payment made by a customer
    async fn latest_for_customer(&self, customer_id: &str) -> Result<Option<Transaction>, PortError>;
}

/// In-memory repository, used when no database is configured and in tests
pub mod memory {
    use super::*;
    use core_kernel::PaymentId;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    struct Store {
        next_id: i64,
        transactions: BTreeMap<PaymentId, Transaction>,
        by_policy: HashMap<PolicyId, PaymentId>,
    }

    #[derive(Debug, Default, Clone)]
    pub struct InMemoryTransactionRepository {
        store: Arc<RwLock<Store>>,
        fail_writes: Arc<AtomicBool>,
    }

    impl InMemoryTransactionRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn len(&self) -> usize {
            self.store.read().await.transactions.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.len().await == 0
        }

        /// Makes subsequent inserts fail, to exercise storage-error paths
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }
    }

    impl DomainPort for InMemoryTransactionRepository {}

    #[async_trait]
    impl TransactionRepository for InMemoryTransactionRepository {
        async fn insert(&self, transaction: NewTransaction) -> Result<Transaction, PortError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PortError::internal("payment store rejected the write"));
            }
            let mut store = self.store.write().await;
            if store.by_policy.contains_key(&transaction.policy_id) {
                return Err(PortError::conflict(format!(
                    "payment already recorded for policy {}",
                    transaction.policy_id
                )));
            }
            store.next_id += 1;
            let stored = transaction.into_transaction(PaymentId::new(store.next_id));
            store.by_policy.insert(stored.policy_id, stored.id);
            store.transactions.insert(stored.id, stored.clone());
            Ok(stored)
        }

        async fn find_by_policy_id(&self, policy_id: PolicyId) -> Result<Option<Transaction>, PortError> {
            let store = self.store.read().await;
            Ok(store
                .by_policy
                .get(&policy_id)
                .and_then(|id| store.transactions.get(id))
                .cloned())
        }

        async fn latest_for_customer(&self, customer_id: &str) -> Result<Option<Transaction>, PortError> {
            let store = self.store.read().await;
            Ok(store
                .transactions
                .values()
                .filter(|t| t.customer_id == customer_id)
                .max_by_key(|t| (t.payment_date, t.id))
                .cloned())
        }
    }
}
