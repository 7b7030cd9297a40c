//! PostgreSQL repository tests
//!
//! Each test starts its own container. Run with
//! `cargo test -p test_utils --test postgres_tests -- --ignored`.

use std::sync::Arc;

use chrono::Utc;
use core_kernel::PolicyId;
use domain_billing::PaymentService;
use domain_claims::{ClaimRepository, ClaimService, NewClaim};
use domain_policy::PolicyOrchestrator;
use domain_product::ProductCatalog;
use infra_cache::CacheLayer;
use infra_db::{
    PostgresClaimRepository, PostgresPolicyRepository, PostgresProductRepository,
    PostgresTransactionRepository,
};
use rust_decimal_macros::dec;
use test_utils::*;

struct Services {
    products: Arc<ProductCatalog>,
    policies: Arc<PolicyOrchestrator>,
    payments: Arc<PaymentService>,
    claims: ClaimService,
}

fn services(db: &TestDatabase) -> Services {
    let pool = db.pool().clone();
    let cache = CacheLayer::disabled();

    let products = Arc::new(ProductCatalog::new(
        Arc::new(PostgresProductRepository::new(pool.clone())),
        cache.clone(),
    ));
    let policies = Arc::new(PolicyOrchestrator::new(
        Arc::new(PostgresPolicyRepository::new(pool.clone())),
        products.clone(),
        cache.clone(),
    ));
    let payments = Arc::new(PaymentService::new(Arc::new(PostgresTransactionRepository::new(
        pool.clone(),
    ))));
    let claims = ClaimService::new(
        Arc::new(PostgresClaimRepository::new(pool)),
        policies.clone(),
        payments.clone(),
        cache,
    );

    Services {
        products,
        policies,
        payments,
        claims,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_lifecycle_against_postgres() {
    let db = TestDatabase::new().await.unwrap();
    let services = services(&db);
    let customer = StringFixtures::customer_id();

    let product_id = services.products.add_product(&RequestFixtures::product()).await.unwrap();
    services.products.validate_product(product_id).await.unwrap();

    let policy_id = services
        .policies
        .issue_policy(&RequestFixtures::issue_policy(product_id))
        .await
        .unwrap();
    let details = services.policies.get_policy_details(policy_id).await.unwrap();
    assert_eq!(details.premium_amount, AmountFixtures::premium());
    assert_eq!(details.product_details.product_name, "Term Life Secure");

    services
        .payments
        .process_payment(&RequestFixtures::payment(policy_id, customer))
        .await
        .unwrap();
    let claim_id = services
        .claims
        .file_claim(&RequestFixtures::claim(policy_id, customer))
        .await
        .unwrap();

    let claim = services.claims.claim_by_id(claim_id).await.unwrap();
    assert_eq!(claim.policy_id, policy_id);
    assert_eq!(claim.claim_amount, AmountFixtures::claim());
    assert_eq!(claim.status, "PENDING");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unique_indexes_surface_as_conflicts() {
    let db = TestDatabase::new().await.unwrap();
    let services = services(&db);

    services.products.add_product(&RequestFixtures::product()).await.unwrap();
    assert_error_code(
        &services.products.add_product(&RequestFixtures::product()).await,
        "DUPLICATE_PRODUCT",
    );

    let policy_id = PolicyId::new(77);
    services
        .payments
        .process_payment(&RequestFixtures::payment(policy_id, "CUST1001"))
        .await
        .unwrap();
    assert_error_code(
        &services
            .payments
            .process_payment(&RequestFixtures::payment(policy_id, "CUST1001"))
            .await,
        "PAYMENT_ALREADY_EXISTS",
    );

    let repository = PostgresClaimRepository::new(db.pool().clone());
    let claim = |number: &str| NewClaim {
        claim_number: number.to_string(),
        policy_id,
        customer_id: "CUST1001".to_string(),
        claim_type: "THEFT".to_string(),
        claim_amount: dec!(250.00),
        description: fake_description(),
        filed_at: Utc::now(),
    };
    repository.insert(claim("CLM-A")).await.unwrap();
    let error = repository.insert(claim("CLM-B")).await.unwrap_err();
    assert!(error.is_conflict(), "expected conflict, got {:?}", error);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_claim_number_collision_is_not_a_duplicate_claim() {
    let db = TestDatabase::new().await.unwrap();
    let repository = PostgresClaimRepository::new(db.pool().clone());
    let claim = |policy_id: i64| NewClaim {
        claim_number: "CLM-SAME".to_string(),
        policy_id: PolicyId::new(policy_id),
        customer_id: "CUST1001".to_string(),
        claim_type: "THEFT".to_string(),
        claim_amount: dec!(250.00),
        description: fake_description(),
        filed_at: Utc::now(),
    };

    repository.insert(claim(1)).await.unwrap();
    let error = repository.insert(claim(2)).await.unwrap_err();

    assert!(!error.is_conflict(), "unexpected conflict: {:?}", error);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_clear_data_resets_identities() {
    let db = TestDatabase::new().await.unwrap();
    let services = services(&db);

    let first = services.products.add_product(&fake_product_request()).await.unwrap();
    db.clear_data().await.unwrap();
    let again = services.products.add_product(&fake_product_request()).await.unwrap();

    assert_eq!(first, again);
    assert_eq!(services.products.list_products().await.unwrap().len(), 1);
}
