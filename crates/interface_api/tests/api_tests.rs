//! Router tests driven through `tower::ServiceExt::oneshot`

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState, Repositories};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState::assemble(&ApiConfig::default(), Repositories::in_memory(), Vec::new()).unwrap();
    create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn product_body() -> Value {
    json!({
        "productName": "Term Life",
        "productType": "LIFE",
        "coverageType": "INDIVIDUAL",
        "minPremium": 100,
        "maxCoverage": 1000000,
        "description": "Twenty year term cover"
    })
}

fn policy_body(product_id: i64) -> Value {
    json!({
        "customerId": 42,
        "productId": product_id,
        "premiumAmount": 1200,
        "coverageAmount": 50000,
        "policyStartDate": Utc::now() - Duration::days(30),
        "policyEndDate": Utc::now() + Duration::days(335),
        "paymentMode": "CREDIT_CARD"
    })
}

fn payment_body(policy_id: i64) -> Value {
    json!({
        "policyId": policy_id,
        "amount": 1200,
        "referenceNumber": "REF-9001",
        "paymentMode": "CREDIT_CARD",
        "paymentType": "PREMIUM",
        "customerId": "CUST42",
        "policyNumber": "POL-1"
    })
}

fn claim_body(policy_id: i64, amount: i64) -> Value {
    json!({
        "policyId": policy_id,
        "customerId": "CUST42",
        "claimType": "MEDICAL",
        "claimAmount": amount,
        "description": "Hospital stay after an accident"
    })
}

async fn issued_policy(app: &Router) -> i64 {
    let (status, product_id) = send(app, Method::POST, "/product", Some(product_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, policy_id) = send(
        app,
        Method::POST,
        "/policy",
        Some(policy_body(product_id.as_i64().unwrap())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    policy_id.as_i64().unwrap()
}

fn assert_envelope(body: &Value, code: &str, path: &str) {
    assert_eq!(body["errorCode"], code);
    assert_eq!(body["path"], path);
    assert!(body["errorMessage"].as_str().is_some_and(|m| !m.is_empty()));
    assert!(body["timestamp"].as_str().is_some());
}

mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_policy_payment_claim_lifecycle() {
        let app = app();
        let policy_id = issued_policy(&app).await;

        let (status, details) = send(&app, Method::GET, &format!("/policy/{}", policy_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(details["policyStatus"], "ACTIVE");
        assert_eq!(details["productDetails"]["productName"], "Term Life");
        assert_eq!(details["paymentDetails"]["paymentStatus"], "NOT_AVAILABLE");

        let (status, body) = send(&app, Method::POST, "/claim", Some(claim_body(policy_id, 5000))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_envelope(&body, "PAYMENT_NOT_FOUND", "/claim");

        let (status, _) = send(&app, Method::POST, "/payment", Some(payment_body(policy_id))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, claim_id) = send(&app, Method::POST, "/claim", Some(claim_body(policy_id, 5000))).await;
        assert_eq!(status, StatusCode::OK);
        let claim_id = claim_id.as_i64().unwrap();

        let (status, body) = send(&app, Method::POST, "/claim", Some(claim_body(policy_id, 100))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_envelope(&body, "CLAIM_ALREADY_EXISTS", "/claim");

        let (status, claim) = send(&app, Method::GET, &format!("/claim/policy/{}", policy_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(claim["claimId"], claim_id);
        assert_eq!(claim["status"], "PENDING");

        let (status, view) = send(&app, Method::GET, &format!("/claim/{}/status", claim_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["status"], "PENDING");
    }

    #[tokio::test]
    async fn test_claim_above_coverage_is_rejected() {
        let app = app();
        let policy_id = issued_policy(&app).await;
        send(&app, Method::POST, "/payment", Some(payment_body(policy_id))).await;

        let (status, body) = send(&app, Method::POST, "/claim", Some(claim_body(policy_id, 50001))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_envelope(&body, "CLAIM_AMOUNT_EXCEEDS_COVERAGE", "/claim");
    }

    #[tokio::test]
    async fn test_claim_by_another_customer_is_forbidden() {
        let app = app();
        let policy_id = issued_policy(&app).await;
        send(&app, Method::POST, "/payment", Some(payment_body(policy_id))).await;

        let mut claim = claim_body(policy_id, 500);
        claim["customerId"] = json!("CUST7");
        let (status, body) = send(&app, Method::POST, "/claim", Some(claim)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_envelope(&body, "CUSTOMER_MISMATCH", "/claim");
    }

    #[tokio::test]
    async fn test_inactive_product_cannot_be_sold() {
        let app = app();
        let mut product = product_body();
        product["active"] = json!(false);
        let (_, product_id) = send(&app, Method::POST, "/product", Some(product)).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/policy",
            Some(policy_body(product_id.as_i64().unwrap())),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_envelope(&body, "PRODUCT_INACTIVE", "/policy");
    }
}

mod catalog_tests {
    use super::*;

    #[tokio::test]
    async fn test_product_crud() {
        let app = app();
        let (_, id) = send(&app, Method::POST, "/product", Some(product_body())).await;
        let id = id.as_i64().unwrap();

        let (status, listed) = send(&app, Method::GET, "/product/type/LIFE", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let mut update = product_body();
        update["productName"] = json!("Term Life Plus");
        let (status, _) = send(&app, Method::PUT, &format!("/product/{}", id), Some(update)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, product) = send(&app, Method::GET, &format!("/product/{}", id), None).await;
        assert_eq!(product["productName"], "Term Life Plus");

        let (status, _) = send(&app, Method::POST, &format!("/product/validate/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::DELETE, &format!("/product/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::GET, &format!("/product/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_envelope(&body, "PRODUCT_NOT_FOUND", &format!("/product/{}", id));

        let (_, listed) = send(&app, Method::GET, "/product", None).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_product_conflicts() {
        let app = app();
        send(&app, Method::POST, "/product", Some(product_body())).await;
        let (status, body) = send(&app, Method::POST, "/product", Some(product_body())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_envelope(&body, "DUPLICATE_PRODUCT", "/product");
    }
}

mod payment_tests {
    use super::*;

    #[tokio::test]
    async fn test_payment_lookups() {
        let app = app();
        let (status, _) = send(&app, Method::POST, "/payment", Some(payment_body(3))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, payment) = send(&app, Method::GET, "/payment/policy/3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payment["status"], "SUCCESS");
        assert!(payment["transactionId"].as_str().unwrap().starts_with("TXN-"));

        let (status, payment) = send(&app, Method::GET, "/payment/customer/CUST42", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payment["policyId"], 3);

        let (status, body) = send(&app, Method::POST, "/payment", Some(payment_body(3))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_envelope(&body, "PAYMENT_ALREADY_EXISTS", "/payment");
    }

    #[tokio::test]
    async fn test_non_numeric_policy_id_has_its_own_code() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/payment/policy/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_envelope(&body, "INVALID_POLICY_ID_FORMAT", "/payment/policy/abc");
    }
}

mod envelope_tests {
    use super::*;

    #[tokio::test]
    async fn test_validation_sub_code_is_reported() {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/claim", Some(claim_body(1, 0))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_envelope(&body, "INVALID_CLAIM_AMOUNT", "/claim");
    }

    #[tokio::test]
    async fn test_malformed_json_uses_the_envelope() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/policy")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_envelope(&body, "MALFORMED_REQUEST", "/policy");
    }

    #[tokio::test]
    async fn test_bad_path_parameter() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/policy/seven", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_envelope(&body, "INVALID_PATH_PARAMETER", "/policy/seven");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/quotes/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_envelope(&body, "RESOURCE_NOT_FOUND", "/quotes/1");
    }

    #[tokio::test]
    async fn test_missing_policy() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/policy/404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_envelope(&body, "POLICY_NOT_FOUND", "/policy/404");
    }
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_lists_every_breaker() {
        let (status, body) = send(&app(), Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");

        let adapters: Vec<&str> = body["checks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|check| check["adapter_id"].as_str().unwrap())
            .collect();
        assert_eq!(adapters, ["product-service", "policy-service", "payment-service"]);
    }
}
