//! Payment processing service

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use core_kernel::{DomainPort, PaymentClient, PaymentId, PaymentView, PolicyId, PortError};

use crate::error::PaymentError;
use crate::events::{PaymentEvent, PaymentEventPublisher, TracingEventPublisher};
use crate::ports::TransactionRepository;
use crate::transaction::{new_transaction_id, NewTransaction, PaymentStatus, Transaction};
use crate::validation::{validate_customer_id, validate_payment_request};
use crate::PaymentRequest;

/// Records payments and answers payment lookups
pub struct PaymentService {
    repository: Arc<dyn TransactionRepository>,
    publisher: Arc<dyn PaymentEventPublisher>,
}

impl PaymentService {
    /// Creates a service that logs its payment events
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        Self::with_publisher(repository, Arc::new(TracingEventPublisher))
    }

    pub fn with_publisher(
        repository: Arc<dyn TransactionRepository>,
        publisher: Arc<dyn PaymentEventPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// Records a payment for a policy
    ///
    /// The payment is stored as SUCCESS with a fresh `TXN-` transaction id
    /// and announced on the payment events topic. A failed announcement is
    /// logged and does not undo the payment.
    ///
    /// # Errors
    ///
    /// * `Invalid` - a field failed validation
    /// * `AlreadyExists` - the policy already has a payment, including when a
    ///   concurrent request won the race
    /// * `ProcessingFailed` - the payment could not be stored
    pub async fn process_payment(&self, request: &PaymentRequest) -> Result<PaymentId, PaymentError> {
        let payment = validate_payment_request(request)?;
        let policy_id = payment.policy_id;

        if self
            .repository
            .find_by_policy_id(policy_id)
            .await
            .map_err(PaymentError::ProcessingFailed)?
            .is_some()
        {
            return Err(PaymentError::AlreadyExists(policy_id));
        }

        let transaction = NewTransaction {
            policy_id,
            customer_id: payment.customer_id,
            policy_number: payment.policy_number,
            payment_mode: payment.payment_mode,
            payment_type: payment.payment_type,
            reference_number: payment.reference_number,
            transaction_id: new_transaction_id(),
            amount: payment.amount,
            status: PaymentStatus::Success,
            description: payment.description,
            payment_date: Utc::now(),
        };

        let stored = self.repository.insert(transaction).await.map_err(|e| {
            if e.is_conflict() {
                PaymentError::AlreadyExists(policy_id)
            } else {
                tracing::error!(policy_id = %policy_id, error = %e, "failed to store payment");
                PaymentError::ProcessingFailed(e)
            }
        })?;

        self.announce(&stored).await;
        tracing::info!(
            payment_id = %stored.id,
            policy_id = %stored.policy_id,
            transaction_id = %stored.transaction_id,
            amount = %stored.amount,
            "payment recorded"
        );
        Ok(stored.id)
    }

    async fn announce(&self, transaction: &Transaction) {
        let event = PaymentEvent::completed(transaction);
        if let Err(e) = self.publisher.publish(&event).await {
            tracing::warn!(payment_id = %transaction.id, error = %e, "payment event not published");
        }
    }

    pub async fn payment_by_policy_id(&self, policy_id: PolicyId) -> Result<PaymentView, PaymentError> {
        let transaction = self
            .repository
            .find_by_policy_id(policy_id)
            .await
            .map_err(PaymentError::Storage)?
            .ok_or_else(|| PaymentError::NotFound(format!("policy ID: {}", policy_id)))?;
        Ok(PaymentView::from(&transaction))
    }

    /// Most recent payment made by a customer
    pub async fn payment_by_customer_id(&self, customer_id: &str) -> Result<PaymentView, PaymentError> {
        let customer_id = validate_customer_id(customer_id)?;
        let transaction = self
            .repository
            .latest_for_customer(&customer_id)
            .await
            .map_err(PaymentError::Storage)?
            .ok_or_else(|| PaymentError::NotFound(format!("customer ID: {}", customer_id)))?;
        Ok(PaymentView::from(&transaction))
    }
}

impl DomainPort for PaymentService {}

#[async_trait]
impl PaymentClient for PaymentService {
    async fn payment_by_policy(&self, policy_id: PolicyId) -> Result<PaymentView, PortError> {
        Ok(self.payment_by_policy_id(policy_id).await?)
    }
}
