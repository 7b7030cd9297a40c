//! Claim Validation Pipeline
//!
//! Runs the checks a claim must pass before it may be stored. Checks run in
//! a fixed order and the first failure ends the run, so a request is never
//! sent to the payment service once the policy has been refused, and the
//! local duplicate lookup only happens after every remote check passed.
//!
//! The payment record is fetched once and serves both the ownership check
//! and the payment-success check. Ownership cannot be established without
//! it, so an unavailable payment service always refuses the claim.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use core_kernel::{FileClaimRequest, PaymentClient, PaymentView, PolicyClient, PolicyId, PolicyView};
use rust_decimal::Decimal;

use crate::error::ClaimError;
use crate::ports::ClaimRepository;
use crate::validation::{validate_claim_request, ClaimFiling};

/// The individual checks, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimCheck {
    Syntax,
    PolicyInForce,
    CustomerOwnership,
    PaymentSuccess,
    CoverageLimit,
    Duplicate,
}

impl ClaimCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimCheck::Syntax => "syntax",
            ClaimCheck::PolicyInForce => "policy-in-force",
            ClaimCheck::CustomerOwnership => "customer-ownership",
            ClaimCheck::PaymentSuccess => "payment-success",
            ClaimCheck::CoverageLimit => "coverage-limit",
            ClaimCheck::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for ClaimCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filing that passed every check
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedClaim {
    pub filing: ClaimFiling,
    pub policy: PolicyView,
    pub payment: PaymentView,
}

/// Policy status must be ACTIVE and `now` must fall inside the policy term
///
/// A missing start or end date leaves that side of the term open.
pub fn ensure_in_force(policy: &PolicyView, now: DateTime<Utc>) -> Result<(), ClaimError> {
    if !policy.policy_status.trim().eq_ignore_ascii_case("ACTIVE") {
        return Err(ClaimError::PolicyNotActive {
            status: policy.policy_status.clone(),
        });
    }
    if let Some(start) = policy.policy_start_date {
        if now < start {
            return Err(ClaimError::PolicyNotStarted(start));
        }
    }
    if let Some(end) = policy.policy_end_date {
        if now > end {
            return Err(ClaimError::PolicyExpired(end));
        }
    }
    Ok(())
}

pub fn ensure_owned_by(payment: &PaymentView, customer_id: &str) -> Result<(), ClaimError> {
    if payment.customer_id != customer_id {
        return Err(ClaimError::CustomerMismatch {
            policy_id: payment.policy_id,
        });
    }
    Ok(())
}

pub fn ensure_payment_successful(payment: &PaymentView) -> Result<(), ClaimError> {
    if !payment.status.trim().eq_ignore_ascii_case("SUCCESS") {
        return Err(ClaimError::PaymentNotSuccessful {
            policy_id: payment.policy_id,
            status: payment.status.clone(),
        });
    }
    Ok(())
}

/// Claims up to and including the coverage amount are allowed
pub fn ensure_within_coverage(amount: Decimal, coverage: Decimal) -> Result<(), ClaimError> {
    if amount > coverage {
        return Err(ClaimError::ClaimAmountExceedsCoverage { amount, coverage });
    }
    Ok(())
}

/// Ordered claim checks against the policy and payment peers and the local
/// claim store
pub struct ClaimValidationPipeline {
    policies: Arc<dyn PolicyClient>,
    payments: Arc<dyn PaymentClient>,
    claims: Arc<dyn ClaimRepository>,
}

impl ClaimValidationPipeline {
    pub fn new(
        policies: Arc<dyn PolicyClient>,
        payments: Arc<dyn PaymentClient>,
        claims: Arc<dyn ClaimRepository>,
    ) -> Self {
        Self {
            policies,
            payments,
            claims,
        }
    }

    pub async fn validate(&self, request: &FileClaimRequest) -> Result<ValidatedClaim, ClaimError> {
        self.validate_at(request, Utc::now()).await
    }

    /// Runs every check with `now` as the current instant
    pub async fn validate_at(
        &self,
        request: &FileClaimRequest,
        now: DateTime<Utc>,
    ) -> Result<ValidatedClaim, ClaimError> {
        let filing = validate_claim_request(request).map_err(|e| {
            tracing::debug!(check = %ClaimCheck::Syntax, code = e.code, "claim refused");
            ClaimError::from(e)
        })?;
        let policy_id = filing.policy_id;

        let policy = self.fetch_policy(policy_id).await?;
        self.record(ClaimCheck::PolicyInForce, policy_id, ensure_in_force(&policy, now))?;

        let payment = self.fetch_payment(policy_id).await?;
        self.record(
            ClaimCheck::CustomerOwnership,
            policy_id,
            ensure_owned_by(&payment, &filing.customer_id),
        )?;
        self.record(
            ClaimCheck::PaymentSuccess,
            policy_id,
            ensure_payment_successful(&payment),
        )?;

        self.record(
            ClaimCheck::CoverageLimit,
            policy_id,
            ensure_within_coverage(filing.claim_amount, policy.coverage_amount),
        )?;

        let earlier = self
            .claims
            .latest_for_policy(policy_id)
            .await
            .map_err(ClaimError::Storage)?;
        let duplicate = match earlier {
            Some(_) => Err(ClaimError::ClaimAlreadyExists(policy_id)),
            None => Ok(()),
        };
        self.record(ClaimCheck::Duplicate, policy_id, duplicate)?;

        Ok(ValidatedClaim {
            filing,
            policy,
            payment,
        })
    }

    fn record(&self, check: ClaimCheck, policy_id: PolicyId, outcome: Result<(), ClaimError>) -> Result<(), ClaimError> {
        match &outcome {
            Ok(()) => tracing::debug!(%check, policy_id = %policy_id, "claim check passed"),
            Err(e) => tracing::info!(%check, policy_id = %policy_id, reason = %e, "claim refused"),
        }
        outcome
    }

    async fn fetch_policy(&self, policy_id: PolicyId) -> Result<PolicyView, ClaimError> {
        self.policies.get_policy(policy_id).await.map_err(|e| {
            tracing::warn!(policy_id = %policy_id, error = %e, "policy lookup failed");
            ClaimError::from_policy_call(policy_id, e)
        })
    }

    async fn fetch_payment(&self, policy_id: PolicyId) -> Result<PaymentView, ClaimError> {
        self.payments.payment_by_policy(policy_id).await.map_err(|e| {
            tracing::warn!(policy_id = %policy_id, error = %e, "payment lookup failed");
            ClaimError::from_payment_call(policy_id, e)
        })
    }
}
