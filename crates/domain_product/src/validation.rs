//! Product request validation

use core_kernel::{is_storable_amount, ProductId, ValidationFailure};
use rust_decimal::Decimal;

use crate::product::{NewProduct, ProductRequest};

fn required(value: &str, code: &'static str, message: &str) -> Result<String, ValidationFailure> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationFailure::new(code, message));
    }
    Ok(trimmed.to_string())
}

/// Checks every field and returns the product ready to be stored
pub fn validate_product_request(request: &ProductRequest) -> Result<NewProduct, ValidationFailure> {
    let name = required(&request.product_name, "INVALID_PRODUCT_NAME", "Product name cannot be empty")?;
    let product_type = required(&request.product_type, "INVALID_PRODUCT_TYPE", "Product type cannot be empty")?;
    let coverage_type = required(&request.coverage_type, "INVALID_COVERAGE_TYPE", "Coverage type cannot be empty")?;

    if request.min_premium <= Decimal::ZERO || !is_storable_amount(&request.min_premium) {
        return Err(ValidationFailure::new(
            "INVALID_MIN_PREMIUM",
            "Minimum premium must be greater than 0 with at most 4 decimal places",
        ));
    }
    if request.max_coverage <= Decimal::ZERO || !is_storable_amount(&request.max_coverage) {
        return Err(ValidationFailure::new(
            "INVALID_MAX_COVERAGE",
            "Maximum coverage must be greater than 0 with at most 4 decimal places",
        ));
    }

    let description = required(&request.description, "INVALID_DESCRIPTION", "Product description cannot be empty")?;

    Ok(NewProduct {
        name,
        product_type,
        coverage_type,
        min_premium: request.min_premium,
        max_coverage: request.max_coverage,
        description,
        active: request.active,
    })
}

pub fn validate_product_id(id: ProductId) -> Result<ProductId, ValidationFailure> {
    if !id.is_valid() {
        return Err(ValidationFailure::new(
            "INVALID_PRODUCT_ID",
            format!("Invalid product ID: {}", id),
        ));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> ProductRequest {
        ProductRequest {
            product_name: " Term Life ".to_string(),
            product_type: "LIFE".to_string(),
            coverage_type: "INDIVIDUAL".to_string(),
            min_premium: dec!(100),
            max_coverage: dec!(1000000),
            description: "Twenty year term".to_string(),
            active: true,
        }
    }

    #[test]
    fn test_valid_request_is_trimmed() {
        let product = validate_product_request(&request()).unwrap();
        assert_eq!(product.name, "Term Life");
    }

    #[test]
    fn test_first_failing_field_wins() {
        let mut bad = request();
        bad.product_type = " ".to_string();
        bad.min_premium = dec!(0);
        assert_eq!(validate_product_request(&bad).unwrap_err().code, "INVALID_PRODUCT_TYPE");
    }

    #[test]
    fn test_amounts_must_be_positive() {
        let mut bad = request();
        bad.max_coverage = dec!(-1);
        assert_eq!(validate_product_request(&bad).unwrap_err().code, "INVALID_MAX_COVERAGE");
    }

    #[test]
    fn test_amounts_must_fit_storage() {
        let mut bad = request();
        bad.min_premium = dec!(99.99999);
        assert_eq!(validate_product_request(&bad).unwrap_err().code, "INVALID_MIN_PREMIUM");

        let mut bad = request();
        bad.max_coverage = dec!(5000000000000000);
        assert_eq!(validate_product_request(&bad).unwrap_err().code, "INVALID_MAX_COVERAGE");
    }

    #[test]
    fn test_product_id_must_be_positive() {
        assert_eq!(
            validate_product_id(ProductId::new(0)).unwrap_err().code,
            "INVALID_PRODUCT_ID"
        );
    }
}
