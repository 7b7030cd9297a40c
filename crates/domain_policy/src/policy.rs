//! Policy entity, issuance request and the enriched read view

use chrono::{DateTime, Utc};
use core_kernel::{PaymentMode, PolicyId, PolicyView, ProductId, ProductView};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a policy
///
/// Issuance always produces `Active`; the other states are reserved for
/// payment-driven transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    Active,
    Pending,
    Expired,
    Cancelled,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Active => "ACTIVE",
            PolicyStatus::Pending => "PENDING",
            PolicyStatus::Expired => "EXPIRED",
            PolicyStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PolicyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            PolicyStatus::Active,
            PolicyStatus::Pending,
            PolicyStatus::Expired,
            PolicyStatus::Cancelled,
        ]
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| format!("unknown policy status: {}", s))
    }
}

/// An issued policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub policy_number: String,
    pub customer_id: i64,
    pub product_id: ProductId,
    pub premium_amount: Decimal,
    pub coverage_amount: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: PolicyStatus,
    pub payment_mode: PaymentMode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Issuance request as received on the wire
///
/// Every field defaults so missing input is reported with its own sub-code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssuePolicyRequest {
    pub customer_id: i64,
    pub product_id: i64,
    pub premium_amount: Decimal,
    pub coverage_amount: Decimal,
    pub policy_start_date: Option<DateTime<Utc>>,
    pub policy_end_date: Option<DateTime<Utc>>,
    pub payment_mode: Option<String>,
}

/// Issuance request after validation
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyTerms {
    pub customer_id: i64,
    pub product_id: ProductId,
    pub premium_amount: Decimal,
    pub coverage_amount: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub payment_mode: PaymentMode,
}

/// A policy ready to be stored; the repository assigns its id
#[derive(Debug, Clone, PartialEq)]
pub struct NewPolicy {
    pub policy_number: String,
    pub terms: PolicyTerms,
    pub status: PolicyStatus,
    pub issued_at: DateTime<Utc>,
}

impl NewPolicy {
    pub fn into_policy(self, id: PolicyId) -> Policy {
        Policy {
            id,
            policy_number: self.policy_number,
            customer_id: self.terms.customer_id,
            product_id: self.terms.product_id,
            premium_amount: self.terms.premium_amount,
            coverage_amount: self.terms.coverage_amount,
            start_date: self.terms.start_date,
            end_date: self.terms.end_date,
            status: self.status,
            payment_mode: self.terms.payment_mode,
            created_at: self.issued_at,
            updated_at: self.issued_at,
        }
    }
}

/// Product sub-view of [`PolicyDetails`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_type: Option<String>,
    pub coverage_type: Option<String>,
}

impl ProductDetails {
    /// Stand-in used when the product service cannot enrich the read
    pub fn placeholder(product_id: ProductId) -> Self {
        Self {
            product_id,
            product_name: format!("Product-{}", product_id),
            product_type: None,
            coverage_type: None,
        }
    }
}

impl From<ProductView> for ProductDetails {
    fn from(view: ProductView) -> Self {
        Self {
            product_id: view.product_id,
            product_name: view.product_name,
            product_type: Some(view.product_type),
            coverage_type: Some(view.coverage_type),
        }
    }
}

pub const NOT_AVAILABLE: &str = "NOT_AVAILABLE";

/// Payment sub-view of [`PolicyDetails`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub payment_id: i64,
    pub payment_mode: PaymentMode,
    pub payment_status: String,
    pub payment_date: Option<DateTime<Utc>>,
}

impl PaymentDetails {
    pub fn placeholder(payment_mode: PaymentMode) -> Self {
        Self {
            payment_id: 0,
            payment_mode,
            payment_status: NOT_AVAILABLE.to_string(),
            payment_date: None,
        }
    }
}

/// Claim sub-view of [`PolicyDetails`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDetails {
    pub claim_id: i64,
    pub claim_type: String,
    pub claim_status: String,
    pub claim_date: Option<DateTime<Utc>>,
}

impl ClaimDetails {
    pub fn placeholder() -> Self {
        Self {
            claim_id: 0,
            claim_type: "NONE".to_string(),
            claim_status: NOT_AVAILABLE.to_string(),
            claim_date: None,
        }
    }
}

/// Policy enriched with product, payment and claim sub-views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDetails {
    pub policy_id: PolicyId,
    pub policy_number: String,
    pub customer_id: i64,
    pub policy_status: PolicyStatus,
    pub premium_amount: Decimal,
    pub coverage_amount: Decimal,
    pub policy_start_date: DateTime<Utc>,
    pub policy_end_date: DateTime<Utc>,
    pub product_details: ProductDetails,
    pub payment_details: PaymentDetails,
    pub claim_details: ClaimDetails,
}

impl PolicyDetails {
    pub fn new(policy: &Policy, product_details: ProductDetails) -> Self {
        Self {
            policy_id: policy.id,
            policy_number: policy.policy_number.clone(),
            customer_id: policy.customer_id,
            policy_status: policy.status,
            premium_amount: policy.premium_amount,
            coverage_amount: policy.coverage_amount,
            policy_start_date: policy.start_date,
            policy_end_date: policy.end_date,
            product_details,
            payment_details: PaymentDetails::placeholder(policy.payment_mode),
            claim_details: ClaimDetails::placeholder(),
        }
    }
}

impl From<&PolicyDetails> for PolicyView {
    fn from(details: &PolicyDetails) -> Self {
        PolicyView {
            policy_id: details.policy_id,
            policy_number: details.policy_number.clone(),
            policy_status: details.policy_status.to_string(),
            premium_amount: details.premium_amount,
            coverage_amount: details.coverage_amount,
            policy_start_date: Some(details.policy_start_date),
            policy_end_date: Some(details.policy_end_date),
        }
    }
}
