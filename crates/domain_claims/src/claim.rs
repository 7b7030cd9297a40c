//! Claim aggregate

use chrono::{DateTime, Utc};
use core_kernel::{ClaimId, ClaimView, PolicyId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    /// Filed, awaiting adjudication
    Pending,
    Approved,
    Rejected,
    /// Approved and settled
    Paid,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "PENDING",
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::Rejected => "REJECTED",
            ClaimStatus::Paid => "PAID",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            ClaimStatus::Pending,
            ClaimStatus::Approved,
            ClaimStatus::Rejected,
            ClaimStatus::Paid,
        ]
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| format!("unknown claim status: {}", s))
    }
}

/// A claim against a policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    /// `CLM-` reference handed to the claimant
    pub claim_number: String,
    pub policy_id: PolicyId,
    pub customer_id: String,
    pub claim_type: String,
    pub claim_amount: Decimal,
    pub description: String,
    pub status: ClaimStatus,
    pub approved_amount: Decimal,
    pub rejection_reason: Option<String>,
    pub claim_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed_at: DateTime<Utc>,
}

/// A claim that passed the pipeline; the repository assigns its id
#[derive(Debug, Clone, PartialEq)]
pub struct NewClaim {
    pub claim_number: String,
    pub policy_id: PolicyId,
    pub customer_id: String,
    pub claim_type: String,
    pub claim_amount: Decimal,
    pub description: String,
    pub filed_at: DateTime<Utc>,
}

impl NewClaim {
    /// Builds the stored claim: PENDING, nothing approved yet, every instant
    /// set to the filing time
    pub fn into_claim(self, id: ClaimId) -> Claim {
        Claim {
            id,
            claim_number: self.claim_number,
            policy_id: self.policy_id,
            customer_id: self.customer_id,
            claim_type: self.claim_type,
            claim_amount: self.claim_amount,
            description: self.description,
            status: ClaimStatus::Pending,
            approved_amount: Decimal::ZERO,
            rejection_reason: None,
            claim_date: self.filed_at,
            created_at: self.filed_at,
            updated_at: self.filed_at,
            processed_at: self.filed_at,
        }
    }
}

impl From<&Claim> for ClaimView {
    fn from(claim: &Claim) -> Self {
        ClaimView {
            claim_id: claim.id,
            claim_number: claim.claim_number.clone(),
            policy_id: claim.policy_id,
            customer_id: claim.customer_id.clone(),
            claim_type: claim.claim_type.clone(),
            claim_amount: claim.claim_amount,
            description: claim.description.clone(),
            status: claim.status.to_string(),
            claim_date: claim.claim_date,
            approved_amount: claim.approved_amount,
            rejection_reason: claim.rejection_reason.clone(),
        }
    }
}

/// Status-only read of a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimStatusView {
    pub claim_id: ClaimId,
    pub claim_number: String,
    pub status: ClaimStatus,
    pub approved_amount: Decimal,
    pub rejection_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Claim> for ClaimStatusView {
    fn from(claim: &Claim) -> Self {
        Self {
            claim_id: claim.id,
            claim_number: claim.claim_number.clone(),
            status: claim.status,
            approved_amount: claim.approved_amount,
            rejection_reason: claim.rejection_reason.clone(),
            updated_at: claim.updated_at,
        }
    }
}
