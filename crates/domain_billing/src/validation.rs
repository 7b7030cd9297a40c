//! Payment request validation

use core_kernel::{is_storable_amount, PaymentMode, PolicyId, ValidationFailure};
use rust_decimal::Decimal;

use crate::transaction::{PaymentRequest, PaymentType};

/// Payment request after validation, fields trimmed
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayment {
    pub policy_id: PolicyId,
    pub amount: Decimal,
    pub payment_mode: PaymentMode,
    pub payment_type: PaymentType,
    pub customer_id: String,
    pub reference_number: String,
    pub policy_number: String,
    pub description: Option<String>,
}

fn required(value: &str, code: &'static str, message: &str) -> Result<String, ValidationFailure> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationFailure::new(code, message));
    }
    Ok(trimmed.to_string())
}

pub fn validate_payment_request(request: &PaymentRequest) -> Result<ValidatedPayment, ValidationFailure> {
    let policy_id = PolicyId::checked(request.policy_id).ok_or_else(|| {
        ValidationFailure::new(
            "INVALID_POLICY_ID",
            format!("Invalid policy ID: {}", request.policy_id),
        )
    })?;

    if request.amount <= Decimal::ZERO {
        return Err(ValidationFailure::new(
            "INVALID_AMOUNT",
            "Payment amount must be greater than 0",
        ));
    }
    if !is_storable_amount(&request.amount) {
        return Err(ValidationFailure::new(
            "INVALID_AMOUNT",
            "Payment amount must have at most 4 decimal places and 15 integer digits",
        ));
    }

    let payment_mode = request
        .payment_mode
        .as_deref()
        .ok_or_else(|| ValidationFailure::new("INVALID_PAYMENT_MODE", "Payment mode cannot be empty"))?
        .parse::<PaymentMode>()
        .map_err(|e| ValidationFailure::new("INVALID_PAYMENT_MODE", e))?;

    let payment_type = required(&request.payment_type, "INVALID_PAYMENT_TYPE", "Payment type cannot be empty")?
        .parse::<PaymentType>()
        .map_err(|e| ValidationFailure::new("INVALID_PAYMENT_TYPE", e))?;

    let customer_id = required(&request.customer_id, "INVALID_CUSTOMER_ID", "Customer ID cannot be empty")?;
    let reference_number = required(
        &request.reference_number,
        "INVALID_REFERENCE_NUMBER",
        "Reference number cannot be empty",
    )?;
    let policy_number = required(&request.policy_number, "INVALID_POLICY_NUMBER", "Policy number cannot be empty")?;

    Ok(ValidatedPayment {
        policy_id,
        amount: request.amount,
        payment_mode,
        payment_type,
        customer_id,
        reference_number,
        policy_number,
        description: request
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
    })
}

/// Parses a policy id received as text, e.g. from a path segment
pub fn parse_policy_id(raw: &str) -> Result<PolicyId, ValidationFailure> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationFailure::new("INVALID_POLICY_ID", "Policy ID cannot be empty"));
    }
    let value: i64 = raw.parse().map_err(|_| {
        ValidationFailure::new(
            "INVALID_POLICY_ID_FORMAT",
            format!("Invalid policy ID format: {}", raw),
        )
    })?;
    PolicyId::checked(value).ok_or_else(|| {
        ValidationFailure::new("INVALID_POLICY_ID", format!("Invalid policy ID: {}", value))
    })
}

pub fn validate_customer_id(raw: &str) -> Result<String, ValidationFailure> {
    required(raw, "INVALID_CUSTOMER_ID", "Customer ID cannot be empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> PaymentRequest {
        PaymentRequest {
            policy_id: 1,
            amount: dec!(1500),
            reference_number: "REF-88".to_string(),
            payment_mode: Some("UPI".to_string()),
            payment_type: "premium".to_string(),
            description: Some("  ".to_string()),
            customer_id: "CUST1".to_string(),
            policy_number: "POL-1".to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        let payment = validate_payment_request(&request()).unwrap();
        assert_eq!(payment.payment_type, PaymentType::Premium);
        assert_eq!(payment.payment_mode, PaymentMode::Upi);
        assert!(payment.description.is_none());
    }

    #[test]
    fn test_sub_codes_in_order() {
        let mut r = request();
        r.amount = dec!(0);
        r.payment_type = String::new();
        assert_eq!(validate_payment_request(&r).unwrap_err().code, "INVALID_AMOUNT");

        let mut r = request();
        r.payment_mode = None;
        assert_eq!(validate_payment_request(&r).unwrap_err().code, "INVALID_PAYMENT_MODE");

        let mut r = request();
        r.payment_type = "GIFT".to_string();
        assert_eq!(validate_payment_request(&r).unwrap_err().code, "INVALID_PAYMENT_TYPE");

        let mut r = request();
        r.reference_number = " ".to_string();
        assert_eq!(validate_payment_request(&r).unwrap_err().code, "INVALID_REFERENCE_NUMBER");

        let mut r = request();
        r.policy_number = String::new();
        assert_eq!(validate_payment_request(&r).unwrap_err().code, "INVALID_POLICY_NUMBER");
    }

    #[test]
    fn test_amount_must_fit_storage() {
        let mut r = request();
        r.amount = dec!(1500.00005);
        assert_eq!(validate_payment_request(&r).unwrap_err().code, "INVALID_AMOUNT");

        r.amount = dec!(1500.2500);
        assert_eq!(validate_payment_request(&r).unwrap().amount, dec!(1500.25));
    }

    #[test]
    fn test_parse_policy_id() {
        assert_eq!(parse_policy_id("12"), Ok(PolicyId::new(12)));
        assert_eq!(parse_policy_id("x1").unwrap_err().code, "INVALID_POLICY_ID_FORMAT");
        assert_eq!(parse_policy_id("0").unwrap_err().code, "INVALID_POLICY_ID");
        assert_eq!(parse_policy_id("").unwrap_err().code, "INVALID_POLICY_ID");
    }
}
