//! Issuance request validation
//!
//! Checks run in a fixed order and the first failure is reported with its
//! sub-code.

use core_kernel::{is_storable_amount, PaymentMode, PolicyId, ProductId, ValidationFailure};
use rust_decimal::Decimal;

use crate::policy::{IssuePolicyRequest, PolicyTerms};

/// Validates an issuance request
///
/// # Returns
///
/// The validated terms, with typed product id and payment mode
pub fn validate_issue_request(request: &IssuePolicyRequest) -> Result<PolicyTerms, ValidationFailure> {
    if request.customer_id <= 0 {
        return Err(ValidationFailure::new(
            "INVALID_CUSTOMER_ID",
            "Customer ID must be greater than 0",
        ));
    }

    let product_id = ProductId::checked(request.product_id).ok_or_else(|| {
        ValidationFailure::new("INVALID_PRODUCT_ID", "Product ID must be greater than 0")
    })?;

    if request.premium_amount <= Decimal::ZERO {
        return Err(ValidationFailure::new(
            "INVALID_PREMIUM_AMOUNT",
            "Premium amount must be greater than 0",
        ));
    }
    if !is_storable_amount(&request.premium_amount) {
        return Err(ValidationFailure::new(
            "INVALID_PREMIUM_AMOUNT",
            "Premium amount must have at most 4 decimal places and 15 integer digits",
        ));
    }

    if request.coverage_amount <= Decimal::ZERO {
        return Err(ValidationFailure::new(
            "INVALID_COVERAGE_AMOUNT",
            "Coverage amount must be greater than 0",
        ));
    }
    if !is_storable_amount(&request.coverage_amount) {
        return Err(ValidationFailure::new(
            "INVALID_COVERAGE_AMOUNT",
            "Coverage amount must have at most 4 decimal places and 15 integer digits",
        ));
    }

    let start_date = request.policy_start_date.ok_or_else(|| {
        ValidationFailure::new("INVALID_START_DATE", "Policy start date is required")
    })?;
    let end_date = request.policy_end_date.ok_or_else(|| {
        ValidationFailure::new("INVALID_END_DATE", "Policy end date is required")
    })?;

    if start_date > end_date {
        return Err(ValidationFailure::new(
            "INVALID_DATE_RANGE",
            "Policy start date cannot be after end date",
        ));
    }

    let payment_mode = request
        .payment_mode
        .as_deref()
        .ok_or_else(|| ValidationFailure::new("INVALID_PAYMENT_MODE", "Payment mode is required"))?
        .parse::<PaymentMode>()
        .map_err(|e| ValidationFailure::new("INVALID_PAYMENT_MODE", e))?;

    Ok(PolicyTerms {
        customer_id: request.customer_id,
        product_id,
        premium_amount: request.premium_amount,
        coverage_amount: request.coverage_amount,
        start_date,
        end_date,
        payment_mode,
    })
}

pub fn validate_policy_id(policy_id: PolicyId) -> Result<PolicyId, ValidationFailure> {
    if !policy_id.is_valid() {
        return Err(ValidationFailure::new(
            "INVALID_POLICY_ID",
            format!("Invalid policy ID: {}", policy_id),
        ));
    }
    Ok(policy_id)
}
