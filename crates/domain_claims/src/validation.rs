//! Syntactic checks on a claim filing

use core_kernel::{is_storable_amount, ClaimId, FileClaimRequest, PolicyId, ValidationFailure};
use rust_decimal::Decimal;

/// Claim filing after the syntactic checks, fields trimmed
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimFiling {
    pub policy_id: PolicyId,
    pub customer_id: String,
    pub claim_type: String,
    pub claim_amount: Decimal,
    pub description: String,
}

/// Customer ids are upper-case ASCII letters and digits only
pub fn is_valid_customer_id(customer_id: &str) -> bool {
    !customer_id.is_empty()
        && customer_id
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

pub fn validate_claim_request(request: &FileClaimRequest) -> Result<ClaimFiling, ValidationFailure> {
    let policy_id = PolicyId::checked(request.policy_id).ok_or_else(|| {
        ValidationFailure::new(
            "INVALID_POLICY_ID",
            format!("Invalid policy ID: {}", request.policy_id),
        )
    })?;

    let customer_id = request.customer_id.trim();
    if customer_id.is_empty() {
        return Err(ValidationFailure::new(
            "INVALID_CUSTOMER_ID",
            "Customer ID cannot be null or empty",
        ));
    }
    if !is_valid_customer_id(customer_id) {
        return Err(ValidationFailure::new(
            "INVALID_CUSTOMER_ID_FORMAT",
            "Invalid customer ID format. Must contain only uppercase letters and numbers",
        ));
    }

    if request.claim_amount <= Decimal::ZERO {
        return Err(ValidationFailure::new(
            "INVALID_CLAIM_AMOUNT",
            "Claim amount must be greater than 0",
        ));
    }
    if !is_storable_amount(&request.claim_amount) {
        return Err(ValidationFailure::new(
            "INVALID_CLAIM_AMOUNT",
            "Claim amount must have at most 4 decimal places and 15 integer digits",
        ));
    }

    let claim_type = request.claim_type.trim();
    if claim_type.is_empty() {
        return Err(ValidationFailure::new("INVALID_CLAIM_TYPE", "Claim type cannot be empty"));
    }

    let description = request.description.trim();
    if description.is_empty() {
        return Err(ValidationFailure::new(
            "INVALID_DESCRIPTION",
            "Claim description cannot be empty",
        ));
    }

    Ok(ClaimFiling {
        policy_id,
        customer_id: customer_id.to_string(),
        claim_type: claim_type.to_string(),
        claim_amount: request.claim_amount,
        description: description.to_string(),
    })
}

pub fn validate_policy_id(id: PolicyId) -> Result<PolicyId, ValidationFailure> {
    if !id.is_valid() {
        return Err(ValidationFailure::new(
            "INVALID_POLICY_ID",
            format!("Invalid policy ID: {}", id),
        ));
    }
    Ok(id)
}

pub fn validate_claim_id(id: ClaimId) -> Result<ClaimId, ValidationFailure> {
    if !id.is_valid() {
        return Err(ValidationFailure::new(
            "INVALID_CLAIM_ID",
            format!("Invalid claim ID: {}", id),
        ));
    }
    Ok(id)
}
