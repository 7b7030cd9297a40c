//! Payment events
//!
//! Completed payments are announced on the `payment-events` topic. No broker
//! is wired in; the shipped publisher writes the event to the log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_kernel::{ClaimId, PaymentId, PolicyId, PortError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::{PaymentType, Transaction};

pub const PAYMENT_EVENTS_TOPIC: &str = "payment-events";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentEventStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEvent {
    pub payment_id: PaymentId,
    pub policy_id: Option<PolicyId>,
    pub claim_id: Option<ClaimId>,
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub status: PaymentEventStatus,
    pub timestamp: DateTime<Utc>,
}

impl PaymentEvent {
    /// Event announcing a stored policy payment
    pub fn completed(transaction: &Transaction) -> Self {
        Self {
            payment_id: transaction.id,
            policy_id: Some(transaction.policy_id),
            claim_id: None,
            amount: transaction.amount,
            payment_type: transaction.payment_type,
            status: PaymentEventStatus::Completed,
            timestamp: Utc::now(),
        }
    }
}

#[async_trait]
pub trait PaymentEventPublisher: Send + Sync + 'static {
    async fn publish(&self, event: &PaymentEvent) -> Result<(), PortError>;
}

/// Publisher that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventPublisher;

#[async_trait]
impl PaymentEventPublisher for TracingEventPublisher {
    async fn publish(&self, event: &PaymentEvent) -> Result<(), PortError> {
        let payload = serde_json::to_string(event).map_err(|e| PortError::Transformation {
            message: e.to_string(),
        })?;
        tracing::info!(topic = PAYMENT_EVENTS_TOPIC, %payload, "payment event published");
        Ok(())
    }
}
