//! Property-Based Test Generators
//!
//! proptest strategies that respect the request invariants, plus `fake`
//! helpers for realistic free text.

use core_kernel::FileClaimRequest;
use domain_product::ProductRequest;
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Customer ids accepted by the claim pipeline: uppercase letters and digits
pub fn customer_id_strategy() -> impl Strategy<Value = String> {
    "[A-Z]{2,6}[0-9]{1,6}"
}

/// Customer ids the claim pipeline rejects for their format
pub fn malformed_customer_id_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,4}[-_ ][A-Z0-9]{1,4}"
}

/// Positive amounts with up to two decimal places
pub fn positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Zero or negative amounts
pub fn non_positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..=0i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// A coverage and a claim amount, together with whether the claim fits
pub fn coverage_and_claim_strategy() -> impl Strategy<Value = (Decimal, Decimal, bool)> {
    (positive_amount_strategy(), positive_amount_strategy())
        .prop_map(|(coverage, claim)| (coverage, claim, claim <= coverage))
}

/// A syntactically valid filing against the given policy
pub fn claim_request_strategy(policy_id: i64) -> impl Strategy<Value = FileClaimRequest> {
    (
        customer_id_strategy(),
        prop_oneof![Just("MEDICAL"), Just("ACCIDENT"), Just("THEFT"), Just("FIRE")],
        positive_amount_strategy(),
        "[A-Za-z ]{5,40}",
    )
        .prop_filter("description must not be blank", |(_, _, _, d)| !d.trim().is_empty())
        .prop_map(move |(customer_id, claim_type, claim_amount, description)| FileClaimRequest {
            policy_id,
            customer_id,
            claim_type: claim_type.to_string(),
            claim_amount,
            description,
        })
}

/// A random but valid product with a fake company-style name
pub fn fake_product_request() -> ProductRequest {
    let name: String = CompanyName().fake();
    let description: String = Sentence(4..10).fake();
    ProductRequest {
        product_name: format!("{} Cover", name),
        product_type: "HEALTH".to_string(),
        coverage_type: "FAMILY".to_string(),
        min_premium: Decimal::new((100..5_000).fake::<i64>(), 0),
        max_coverage: Decimal::new((50_000..5_000_000).fake::<i64>(), 0),
        description,
        active: true,
    }
}

/// A fake claim description
pub fn fake_description() -> String {
    Sentence(5..12).fake()
}
