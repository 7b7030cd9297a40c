//! Policy Orchestrator Tests
//!
//! # Test Organization
//!
//! - `validation_tests` - Request sub-codes, reported in check order
//! - `issuance_tests` - Product gates, persistence and cache eviction
//! - `details_tests` - Enriched reads, placeholders and cache coherence
//! - `client_tests` - The in-process `PolicyClient` contract

use std::sync::Arc;

use chrono::{Duration, Utc};
use core_kernel::mock::{StubBehavior, StubProductClient};
use core_kernel::{
    CircuitBreakerConfig, DomainError, ErrorKind, PolicyClient, PolicyId, ProductId, ProductView,
};
use domain_policy::ports::memory::InMemoryPolicyRepository;
use domain_policy::validation::validate_issue_request;
use domain_policy::{IssuePolicyRequest, PolicyError, PolicyOrchestrator, PolicyStatus};
use infra_cache::CacheLayer;
use rust_decimal_macros::dec;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn product(id: i64, active: bool) -> ProductView {
    ProductView {
        product_id: ProductId::new(id),
        product_name: "Family Health".to_string(),
        product_type: "HEALTH".to_string(),
        coverage_type: "FAMILY".to_string(),
        min_premium: dec!(1000),
        max_coverage: dec!(1000000),
        description: Some("Hospitalisation cover".to_string()),
        active,
    }
}

fn request(product_id: i64) -> IssuePolicyRequest {
    let start = Utc::now();
    IssuePolicyRequest {
        customer_id: 501,
        product_id,
        premium_amount: dec!(12000.50),
        coverage_amount: dec!(500000),
        policy_start_date: Some(start),
        policy_end_date: Some(start + Duration::days(365)),
        payment_mode: Some("credit_card".to_string()),
    }
}

struct Fixture {
    products: Arc<StubProductClient>,
    repository: InMemoryPolicyRepository,
    orchestrator: PolicyOrchestrator,
}

async fn fixture() -> Fixture {
    let products = StubProductClient::new();
    products.insert(product(1, true)).await;
    products.insert(product(2, false)).await;
    let repository = InMemoryPolicyRepository::new();
    let orchestrator = PolicyOrchestrator::new(
        Arc::new(repository.clone()),
        products.clone(),
        CacheLayer::in_memory(),
    );
    Fixture {
        products,
        repository,
        orchestrator,
    }
}

// ============================================================================
// Validation
// ============================================================================

mod validation_tests {
    use super::*;

    fn code_of(request: &IssuePolicyRequest) -> &'static str {
        validate_issue_request(request).unwrap_err().code
    }

    #[test]
    fn test_valid_request_parses_payment_mode() {
        let terms = validate_issue_request(&request(1)).unwrap();
        assert_eq!(terms.product_id, ProductId::new(1));
        assert_eq!(terms.payment_mode, core_kernel::PaymentMode::CreditCard);
    }

    #[test]
    fn test_each_field_has_its_sub_code() {
        let mut r = request(1);
        r.customer_id = 0;
        assert_eq!(code_of(&r), "INVALID_CUSTOMER_ID");

        let mut r = request(0);
        assert_eq!(code_of(&r), "INVALID_PRODUCT_ID");
        r.product_id = 1;
        r.premium_amount = dec!(0);
        assert_eq!(code_of(&r), "INVALID_PREMIUM_AMOUNT");

        let mut r = request(1);
        r.coverage_amount = dec!(-5);
        assert_eq!(code_of(&r), "INVALID_COVERAGE_AMOUNT");

        let mut r = request(1);
        r.policy_start_date = None;
        assert_eq!(code_of(&r), "INVALID_START_DATE");

        let mut r = request(1);
        r.policy_end_date = None;
        assert_eq!(code_of(&r), "INVALID_END_DATE");

        let mut r = request(1);
        r.payment_mode = None;
        assert_eq!(code_of(&r), "INVALID_PAYMENT_MODE");
        r.payment_mode = Some("barter".to_string());
        assert_eq!(code_of(&r), "INVALID_PAYMENT_MODE");
    }

    #[test]
    fn test_amounts_finer_than_storage_are_rejected() {
        let mut r = request(1);
        r.premium_amount = dec!(100.12345);
        assert_eq!(code_of(&r), "INVALID_PREMIUM_AMOUNT");

        let mut r = request(1);
        r.coverage_amount = dec!(1000000000000000);
        assert_eq!(code_of(&r), "INVALID_COVERAGE_AMOUNT");

        let mut r = request(1);
        r.premium_amount = dec!(100.1234);
        assert_eq!(validate_issue_request(&r).unwrap().premium_amount, dec!(100.1234));
    }

    #[test]
    fn test_start_after_end_is_rejected() {
        let mut r = request(1);
        r.policy_end_date = r.policy_start_date.map(|s| s - Duration::seconds(1));
        assert_eq!(code_of(&r), "INVALID_DATE_RANGE");
    }

    #[test]
    fn test_start_equal_to_end_is_accepted() {
        let mut r = request(1);
        r.policy_end_date = r.policy_start_date;
        assert!(validate_issue_request(&r).is_ok());
    }

    #[test]
    fn test_first_violation_wins() {
        let mut r = request(0);
        r.customer_id = -1;
        assert_eq!(code_of(&r), "INVALID_CUSTOMER_ID");
    }
}

// ============================================================================
// Issuance
// ============================================================================

mod issuance_tests {
    use super::*;

    #[tokio::test]
    async fn test_issue_policy_persists_active_policy() {
        let f = fixture().await;

        let id = f.orchestrator.issue_policy(&request(1)).await.unwrap();

        let details = f.orchestrator.get_policy_details(id).await.unwrap();
        assert_eq!(details.policy_status, PolicyStatus::Active);
        assert!(details.policy_number.starts_with("POL-"));
        assert_eq!(f.repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_policy_numbers_are_unique() {
        let f = fixture().await;
        let a = f.orchestrator.issue_policy(&request(1)).await.unwrap();
        let b = f.orchestrator.issue_policy(&request(1)).await.unwrap();

        let a = f.orchestrator.get_policy_details(a).await.unwrap();
        let b = f.orchestrator.get_policy_details(b).await.unwrap();
        assert_ne!(a.policy_number, b.policy_number);
    }

    #[tokio::test]
    async fn test_inactive_product_creates_no_policy() {
        let f = fixture().await;

        let err = f.orchestrator.issue_policy(&request(2)).await.unwrap_err();

        assert!(matches!(err, PolicyError::ProductInactive(_)));
        assert_eq!(err.code(), "PRODUCT_INACTIVE");
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(f.repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let f = fixture().await;

        let err = f.orchestrator.issue_policy(&request(77)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.code(), "PRODUCT_NOT_FOUND");
        assert_eq!(f.products.calls(), 1, "details fetch skipped after failed validation");
    }

    #[tokio::test]
    async fn test_invalid_request_never_calls_product_service() {
        let f = fixture().await;
        let mut bad = request(1);
        bad.premium_amount = dec!(0);

        let err = f.orchestrator.issue_policy(&bad).await.unwrap_err();

        assert_eq!(err.code(), "INVALID_PREMIUM_AMOUNT");
        assert_eq!(f.products.calls(), 0);
    }

    #[tokio::test]
    async fn test_product_service_down_is_dependency_unavailable() {
        let f = fixture().await;
        f.products.set_behavior(StubBehavior::Unavailable).await;

        let err = f.orchestrator.issue_policy(&request(1)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DependencyUnavailable);
        assert!(f.repository.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_breaker_fails_fast() {
        let products = StubProductClient::new();
        products.set_behavior(StubBehavior::Hang).await;
        let config = CircuitBreakerConfig {
            failure_threshold: 1,
            call_timeout_ms: 200,
            ..Default::default()
        };
        let guarded = Arc::new(infra_resilience::Resilient::new(
            "product-service",
            products.clone(),
            config,
        ));
        let orchestrator = PolicyOrchestrator::new(
            Arc::new(InMemoryPolicyRepository::new()),
            guarded,
            CacheLayer::in_memory(),
        );

        let started = tokio::time::Instant::now();
        let first = orchestrator.issue_policy(&request(1)).await.unwrap_err();
        assert_eq!(first.kind(), ErrorKind::DependencyUnavailable);
        assert!(started.elapsed() <= std::time::Duration::from_millis(200));

        let second = orchestrator.issue_policy(&request(1)).await.unwrap_err();
        assert_eq!(second.code(), "PRODUCT_SERVICE_UNAVAILABLE");
        assert_eq!(products.calls(), 1, "open circuit must not reach the peer");
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal() {
        let f = fixture().await;
        f.repository.fail_writes(true);

        let err = f.orchestrator.issue_policy(&request(1)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InternalFailure);
        assert_eq!(err.public_message(), "An unexpected error occurred");
    }
}

// ============================================================================
// Details
// ============================================================================

mod details_tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_preserves_terms() {
        let f = fixture().await;
        let req = request(1);
        let id = f.orchestrator.issue_policy(&req).await.unwrap();

        let details = f.orchestrator.get_policy_details(id).await.unwrap();

        assert_eq!(details.premium_amount, req.premium_amount);
        assert_eq!(details.coverage_amount, req.coverage_amount);
        assert_eq!(Some(details.policy_start_date), req.policy_start_date);
        assert_eq!(Some(details.policy_end_date), req.policy_end_date);
        assert_eq!(details.product_details.product_name, "Family Health");
        assert_eq!(details.payment_details.payment_status, "NOT_AVAILABLE");
        assert_eq!(details.claim_details.claim_type, "NONE");
    }

    #[tokio::test]
    async fn test_repeated_reads_are_identical() {
        let f = fixture().await;
        let id = f.orchestrator.issue_policy(&request(1)).await.unwrap();

        let first = f.orchestrator.get_policy_details(id).await.unwrap();
        let second = f.orchestrator.get_policy_details(id).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_product_outage_degrades_to_placeholder() {
        let f = fixture().await;
        let id = f.orchestrator.issue_policy(&request(1)).await.unwrap();
        f.products.set_behavior(StubBehavior::Unavailable).await;

        let details = f.orchestrator.get_policy_details(id).await.unwrap();

        assert_eq!(details.product_details.product_name, "Product-1");
        assert_eq!(details.product_details.product_id, ProductId::new(1));
    }

    #[tokio::test]
    async fn test_missing_policy_is_not_found() {
        let f = fixture().await;
        let err = f
            .orchestrator
            .get_policy_details(PolicyId::new(404))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "POLICY_NOT_FOUND");
        assert_eq!(err.kind().status_code(), 404);
    }

    #[tokio::test]
    async fn test_non_positive_id_is_invalid() {
        let f = fixture().await;
        let err = f
            .orchestrator
            .get_policy_details(PolicyId::new(0))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_POLICY_ID");
    }

    #[tokio::test]
    async fn test_details_serialize_camel_case() {
        let f = fixture().await;
        let id = f.orchestrator.issue_policy(&request(1)).await.unwrap();
        let details = f.orchestrator.get_policy_details(id).await.unwrap();

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["policyStatus"], "ACTIVE");
        assert_eq!(json["productDetails"]["productName"], "Family Health");
        assert_eq!(json["paymentDetails"]["paymentMode"], "CREDIT_CARD");
    }
}

// ============================================================================
// In-process client
// ============================================================================

mod client_tests {
    use super::*;

    #[tokio::test]
    async fn test_policy_view_carries_status_and_window() {
        let f = fixture().await;
        let id = f.orchestrator.issue_policy(&request(1)).await.unwrap();

        let view = f.orchestrator.get_policy(id).await.unwrap();

        assert_eq!(view.policy_status, "ACTIVE");
        assert_eq!(view.coverage_amount, dec!(500000));
        assert!(view.policy_start_date.is_some());
    }

    #[tokio::test]
    async fn test_missing_policy_is_port_not_found() {
        let f = fixture().await;
        let err = f.orchestrator.get_policy(PolicyId::new(9)).await.unwrap_err();
        assert!(err.is_not_found());
    }
}

// ============================================================================
// Properties
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn issued_terms_read_back_exactly(
            premium_cents in 1i64..10_000_000,
            coverage_cents in 1i64..1_000_000_000,
            days in 0i64..3650,
        ) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async {
                let f = fixture().await;
                let mut req = request(1);
                req.premium_amount = Decimal::new(premium_cents, 2);
                req.coverage_amount = Decimal::new(coverage_cents, 2);
                req.policy_end_date = req.policy_start_date.map(|s| s + Duration::days(days));

                let id = f.orchestrator.issue_policy(&req).await.unwrap();
                let details = f.orchestrator.get_policy_details(id).await.unwrap();

                assert_eq!(details.premium_amount, req.premium_amount);
                assert_eq!(details.coverage_amount, req.coverage_amount);
                assert_eq!(Some(details.policy_end_date), req.policy_end_date);
            });
        }
    }
}
