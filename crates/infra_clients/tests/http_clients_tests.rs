//! Peer adapters against a local axum server

use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use core_kernel::{
    ClaimClient, ClaimId, FileClaimRequest, PaymentClient, PolicyClient, PolicyId, PortError,
    ProductClient, ProductId,
};
use infra_clients::{HttpClaimClient, HttpPaymentClient, HttpPeer, HttpPolicyClient, HttpProductClient};
use rust_decimal_macros::dec;
use serde_json::json;
use tokio::net::TcpListener;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn peer(service: &str, base_url: &str) -> HttpPeer {
    HttpPeer::new(service, base_url, Duration::from_millis(300)).unwrap()
}

async fn policy(Path(id): Path<i64>) -> impl IntoResponse {
    if id != 1 {
        let body = json!({
            "errorMessage": format!("Policy not found with ID: {}", id),
            "errorCode": "POLICY_NOT_FOUND",
            "timestamp": "2026-03-01T10:00:00Z",
            "path": format!("/policy/{}", id),
        });
        return (StatusCode::NOT_FOUND, Json(body));
    }
    let body = json!({
        "policyId": 1,
        "policyNumber": "POL-0001",
        "customerId": 10,
        "policyStatus": "ACTIVE",
        "premiumAmount": "1200.00",
        "coverageAmount": "50000",
        "policyStartDate": "2026-01-01T00:00:00Z",
        "policyEndDate": "2027-01-01T00:00:00Z",
        "productDetails": {"productId": 3, "productName": "Term Life"}
    });
    (StatusCode::OK, Json(body))
}

#[tokio::test]
async fn test_policy_view_is_decoded_and_missing_policy_is_not_found() {
    let url = serve(Router::new().route("/policy/:id", get(policy))).await;
    let client = HttpPolicyClient::new(peer("policy-service", &url));

    let view = client.get_policy(PolicyId::new(1)).await.unwrap();
    assert_eq!(view.policy_number, "POL-0001");
    assert_eq!(view.coverage_amount, dec!(50000));

    let missing = client.get_policy(PolicyId::new(2)).await.unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn test_claim_filing_returns_the_bare_id() {
    let app = Router::new().route(
        "/claim",
        post(|Json(request): Json<FileClaimRequest>| async move {
            if request.claim_amount > dec!(1000) {
                let body = json!({
                    "errorMessage": "Claim amount exceeds policy coverage",
                    "errorCode": "CLAIM_AMOUNT_EXCEEDS_COVERAGE",
                    "timestamp": "2026-03-01T10:00:00Z",
                    "path": "/claim",
                });
                return (StatusCode::BAD_REQUEST, Json(body));
            }
            (StatusCode::OK, Json(json!(41)))
        }),
    );
    let url = serve(app).await;
    let client = HttpClaimClient::new(peer("claim-service", &url));

    let mut request = FileClaimRequest {
        policy_id: 1,
        customer_id: "CUST1".to_string(),
        claim_type: "MEDICAL".to_string(),
        claim_amount: dec!(500),
        description: "Hospital stay".to_string(),
    };
    assert_eq!(client.file_claim(&request).await.unwrap(), ClaimId::new(41));

    request.claim_amount = dec!(5000);
    match client.file_claim(&request).await.unwrap_err() {
        PortError::Validation { message } => assert!(message.starts_with("CLAIM_AMOUNT_EXCEEDS_COVERAGE")),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_product_validation_only_checks_status() {
    let app = Router::new().route(
        "/product/validate/:id",
        post(|Path(id): Path<i64>| async move {
            if id == 3 {
                StatusCode::OK
            } else {
                StatusCode::NOT_FOUND
            }
        }),
    );
    let url = serve(app).await;
    let client = HttpProductClient::new(peer("product-service", &url));

    client.validate_product(ProductId::new(3)).await.unwrap();
    assert!(client.validate_product(ProductId::new(4)).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let app = Router::new().route(
        "/payment/policy/:id",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let url = serve(app).await;
    let client = HttpPaymentClient::new(peer("payment-service", &url));

    let error = client.payment_by_policy(PolicyId::new(1)).await.unwrap_err();
    assert!(matches!(error, PortError::ServiceUnavailable { ref service } if service == "payment-service"));
}

#[tokio::test]
async fn test_slow_peer_times_out() {
    let app = Router::new().route(
        "/product/:id",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK
        }),
    );
    let url = serve(app).await;
    let client = HttpProductClient::new(peer("product-service", &url));

    let error = client.get_product(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(error, PortError::Timeout { duration_ms: 300, .. }));
}

#[tokio::test]
async fn test_refused_connection_is_transient() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpPolicyClient::new(peer("policy-service", &format!("http://{}", addr)));
    let error = client.get_policy(PolicyId::new(1)).await.unwrap_err();
    assert!(matches!(error, PortError::Connection { .. }));
    assert!(error.is_transient());
}

#[tokio::test]
async fn test_garbled_body_is_a_transformation_error() {
    let app = Router::new().route("/claim/policy/:id", get(|| async { "not json" }));
    let url = serve(app).await;
    let client = HttpClaimClient::new(peer("claim-service", &url));

    let error = client.claim_by_policy(PolicyId::new(1)).await.unwrap_err();
    assert!(matches!(error, PortError::Transformation { .. }));
}
