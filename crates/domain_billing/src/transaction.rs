//! Payment transactions

use chrono::{DateTime, Utc};
use core_kernel::{PaymentId, PaymentMode, PaymentView, PolicyId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// What a payment is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Premium,
    Renewal,
    ClaimPayment,
    AdministrativeFee,
}

impl PaymentType {
    pub const ALL: [PaymentType; 4] = [
        PaymentType::Premium,
        PaymentType::Renewal,
        PaymentType::ClaimPayment,
        PaymentType::AdministrativeFee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Premium => "PREMIUM",
            PaymentType::Renewal => "RENEWAL",
            PaymentType::ClaimPayment => "CLAIM_PAYMENT",
            PaymentType::AdministrativeFee => "ADMINISTRATIVE_FEE",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PaymentType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Invalid payment type: {}. Valid types are: PREMIUM, RENEWAL, CLAIM_PAYMENT, ADMINISTRATIVE_FEE",
                    s
                )
            })
    }
}

/// Outcome of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Success,
    Failed,
    Pending,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Success => "SUCCESS",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Pending => "PENDING",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [PaymentStatus::Success, PaymentStatus::Failed, PaymentStatus::Pending]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown payment status: {}", s))
    }
}

/// A recorded payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: PaymentId,
    pub policy_id: PolicyId,
    pub customer_id: String,
    pub policy_number: String,
    pub payment_mode: PaymentMode,
    pub payment_type: PaymentType,
    pub reference_number: String,
    /// Generated `TXN-` identifier handed back to the payer
    pub transaction_id: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub description: Option<String>,
    pub payment_date: DateTime<Utc>,
}

/// A validated payment not yet stored; the repository assigns its id
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub policy_id: PolicyId,
    pub customer_id: String,
    pub policy_number: String,
    pub payment_mode: PaymentMode,
    pub payment_type: PaymentType,
    pub reference_number: String,
    pub transaction_id: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub description: Option<String>,
    pub payment_date: DateTime<Utc>,
}

impl NewTransaction {
    pub fn into_transaction(self, id: PaymentId) -> Transaction {
        Transaction {
            id,
            policy_id: self.policy_id,
            customer_id: self.customer_id,
            policy_number: self.policy_number,
            payment_mode: self.payment_mode,
            payment_type: self.payment_type,
            reference_number: self.reference_number,
            transaction_id: self.transaction_id,
            amount: self.amount,
            status: self.status,
            description: self.description,
            payment_date: self.payment_date,
        }
    }
}

/// Payment request as received on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentRequest {
    pub policy_id: i64,
    pub amount: Decimal,
    pub reference_number: String,
    pub payment_mode: Option<String>,
    pub payment_type: String,
    pub description: Option<String>,
    pub customer_id: String,
    pub policy_number: String,
}

/// Returns a fresh `TXN-XXXXXXXX` transaction identifier
pub fn new_transaction_id() -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("TXN-{}", simple[..8].to_uppercase())
}

impl From<&Transaction> for PaymentView {
    fn from(transaction: &Transaction) -> Self {
        PaymentView {
            payment_id: transaction.id,
            policy_id: transaction.policy_id,
            customer_id: transaction.customer_id.clone(),
            policy_number: transaction.policy_number.clone(),
            payment_mode: transaction.payment_mode.to_string(),
            payment_type: transaction.payment_type.to_string(),
            reference_number: transaction.reference_number.clone(),
            transaction_id: transaction.transaction_id.clone(),
            amount: transaction.amount,
            status: transaction.status.to_string(),
            payment_date: transaction.payment_date,
        }
    }
}
