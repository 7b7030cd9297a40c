//! Contracts for the peer services
//!
//! Each service owns its entities; the others only ever see the read views
//! below, obtained through one of the four client traits. The views use the
//! same camelCase JSON shapes as the public operations, so an HTTP adapter
//! and an in-process adapter are interchangeable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::identifiers::{ClaimId, PaymentId, PolicyId, ProductId};
use crate::ports::{DomainPort, PortError};

pub const PRODUCT_SERVICE: &str = "product-service";
pub const POLICY_SERVICE: &str = "policy-service";
pub const PAYMENT_SERVICE: &str = "payment-service";
pub const CLAIM_SERVICE: &str = "claim-service";

/// How a premium is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    Cash,
    Cheque,
    DebitCard,
    CreditCard,
    NetBanking,
    Upi,
    Paypal,
    ApplePay,
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 8] = [
        PaymentMode::Cash,
        PaymentMode::Cheque,
        PaymentMode::DebitCard,
        PaymentMode::CreditCard,
        PaymentMode::NetBanking,
        PaymentMode::Upi,
        PaymentMode::Paypal,
        PaymentMode::ApplePay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "CASH",
            PaymentMode::Cheque => "CHEQUE",
            PaymentMode::DebitCard => "DEBIT_CARD",
            PaymentMode::CreditCard => "CREDIT_CARD",
            PaymentMode::NetBanking => "NET_BANKING",
            PaymentMode::Upi => "UPI",
            PaymentMode::Paypal => "PAYPAL",
            PaymentMode::ApplePay => "APPLE_PAY",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = String;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PaymentMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown payment mode: {}", s))
    }
}

/// Catalog entry as seen by other services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_type: String,
    pub coverage_type: String,
    pub min_premium: Decimal,
    pub max_coverage: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    pub active: bool,
}

/// Policy as seen by other services
///
/// Status stays a string: it is peer data and is compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyView {
    pub policy_id: PolicyId,
    pub policy_number: String,
    pub policy_status: String,
    pub premium_amount: Decimal,
    pub coverage_amount: Decimal,
    #[serde(default)]
    pub policy_start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub policy_end_date: Option<DateTime<Utc>>,
}

/// Payment record as seen by other services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub payment_id: PaymentId,
    pub policy_id: PolicyId,
    pub customer_id: String,
    pub policy_number: String,
    pub payment_mode: String,
    pub payment_type: String,
    pub reference_number: String,
    pub transaction_id: String,
    pub amount: Decimal,
    pub status: String,
    pub payment_date: DateTime<Utc>,
}

/// Claim as seen by other services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimView {
    pub claim_id: ClaimId,
    pub claim_number: String,
    pub policy_id: PolicyId,
    pub customer_id: String,
    pub claim_type: String,
    pub claim_amount: Decimal,
    pub description: String,
    pub status: String,
    pub claim_date: DateTime<Utc>,
    pub approved_amount: Decimal,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// Inbound claim filing
///
/// Missing fields deserialize to empty values so the syntactic checks report
/// them with their own codes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileClaimRequest {
    pub policy_id: i64,
    pub customer_id: String,
    pub claim_type: String,
    pub claim_amount: Decimal,
    pub description: String,
}

#[async_trait]
pub trait ProductClient: DomainPort {
    /// Succeeds if the product exists, whatever its activity flag
    async fn validate_product(&self, product_id: ProductId) -> Result<(), PortError>;

    async fn get_product(&self, product_id: ProductId) -> Result<ProductView, PortError>;
}

#[async_trait]
pub trait PolicyClient: DomainPort {
    async fn get_policy(&self, policy_id: PolicyId) -> Result<PolicyView, PortError>;
}

#[async_trait]
pub trait PaymentClient: DomainPort {
    async fn payment_by_policy(&self, policy_id: PolicyId) -> Result<PaymentView, PortError>;
}

#[async_trait]
pub trait ClaimClient: DomainPort {
    async fn file_claim(&self, request: &FileClaimRequest) -> Result<ClaimId, PortError>;

    async fn claim_by_policy(&self, policy_id: PolicyId) -> Result<ClaimView, PortError>;
}
