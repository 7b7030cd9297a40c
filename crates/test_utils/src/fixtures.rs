//! Pre-built Test Fixtures
//!
//! Valid requests for every service. Each one passes validation as is;
//! tests override the single field they care about.

use chrono::{DateTime, Duration, Utc};
use core_kernel::{FileClaimRequest, PolicyId, ProductId};
use domain_billing::PaymentRequest;
use domain_policy::IssuePolicyRequest;
use domain_product::ProductRequest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Start of a policy that is currently in force
    pub fn in_force_start() -> DateTime<Utc> {
        Utc::now() - Duration::days(30)
    }

    /// End of a policy that is currently in force
    pub fn in_force_end() -> DateTime<Utc> {
        Utc::now() + Duration::days(335)
    }

    /// A start date that has not arrived yet
    pub fn future_start() -> DateTime<Utc> {
        Utc::now() + Duration::days(10)
    }

    /// An end date that has already passed
    pub fn past_end() -> DateTime<Utc> {
        Utc::now() - Duration::days(1)
    }
}

/// Fixture for string identifiers
pub struct StringFixtures;

impl StringFixtures {
    /// Customer id as used by payments and claims
    pub fn customer_id() -> &'static str {
        "CUST1001"
    }

    /// Numeric customer id as used by policies
    pub fn policy_customer_id() -> i64 {
        1001
    }

    pub fn reference_number() -> &'static str {
        "REF-20260101-01"
    }
}

/// Fixture for amounts
pub struct AmountFixtures;

impl AmountFixtures {
    pub fn premium() -> Decimal {
        dec!(1200.00)
    }

    pub fn coverage() -> Decimal {
        dec!(50000.00)
    }

    /// A claim comfortably within coverage
    pub fn claim() -> Decimal {
        dec!(7500.00)
    }
}

/// Fixture for service requests
pub struct RequestFixtures;

impl RequestFixtures {
    pub fn product() -> ProductRequest {
        ProductRequest {
            product_name: "Term Life Secure".to_string(),
            product_type: "LIFE".to_string(),
            coverage_type: "INDIVIDUAL".to_string(),
            min_premium: dec!(500),
            max_coverage: dec!(1000000),
            description: "Twenty year level term cover".to_string(),
            active: true,
        }
    }

    pub fn issue_policy(product_id: ProductId) -> IssuePolicyRequest {
        IssuePolicyRequest {
            customer_id: StringFixtures::policy_customer_id(),
            product_id: product_id.value(),
            premium_amount: AmountFixtures::premium(),
            coverage_amount: AmountFixtures::coverage(),
            policy_start_date: Some(TemporalFixtures::in_force_start()),
            policy_end_date: Some(TemporalFixtures::in_force_end()),
            payment_mode: Some("CREDIT_CARD".to_string()),
        }
    }

    pub fn payment(policy_id: PolicyId, customer_id: &str) -> PaymentRequest {
        PaymentRequest {
            policy_id: policy_id.value(),
            amount: AmountFixtures::premium(),
            reference_number: StringFixtures::reference_number().to_string(),
            payment_mode: Some("CREDIT_CARD".to_string()),
            payment_type: "PREMIUM".to_string(),
            description: Some("First premium".to_string()),
            customer_id: customer_id.to_string(),
            policy_number: format!("POL-{}", policy_id),
        }
    }

    pub fn claim(policy_id: PolicyId, customer_id: &str) -> FileClaimRequest {
        FileClaimRequest {
            policy_id: policy_id.value(),
            customer_id: customer_id.to_string(),
            claim_type: "MEDICAL".to_string(),
            claim_amount: AmountFixtures::claim(),
            description: "Emergency surgery and three nights in hospital".to_string(),
        }
    }
}
