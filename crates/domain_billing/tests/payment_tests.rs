//! Payment Service Tests
//!
//! # Test Organization
//!
//! - `processing_tests` - Recording payments, duplicates and storage failures
//! - `lookup_tests` - Reads by policy and by customer
//! - `event_tests` - Payment event publication
//! - `property_tests` - Amount validation over arbitrary input

use std::sync::Arc;

use async_trait::async_trait;
use core_kernel::{DomainError, ErrorKind, PaymentClient, PolicyId, PortError};
use domain_billing::events::PaymentEventStatus;
use domain_billing::ports::memory::InMemoryTransactionRepository;
use domain_billing::{
    PaymentError, PaymentEvent, PaymentEventPublisher, PaymentRequest, PaymentService,
    TransactionRepository,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Mutex;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn request(policy_id: i64, customer_id: &str) -> PaymentRequest {
    PaymentRequest {
        policy_id,
        amount: dec!(12000.50),
        reference_number: format!("REF-{}", policy_id),
        payment_mode: Some("NET_BANKING".to_string()),
        payment_type: "PREMIUM".to_string(),
        description: Some("Annual premium".to_string()),
        customer_id: customer_id.to_string(),
        policy_number: format!("POL-{}", policy_id),
    }
}

#[derive(Default)]
struct RecordingPublisher {
    events: Mutex<Vec<PaymentEvent>>,
    fail: bool,
}

#[async_trait]
impl PaymentEventPublisher for RecordingPublisher {
    async fn publish(&self, event: &PaymentEvent) -> Result<(), PortError> {
        if self.fail {
            return Err(PortError::connection("broker down"));
        }
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

fn service() -> (InMemoryTransactionRepository, PaymentService) {
    let repository = InMemoryTransactionRepository::new();
    let service = PaymentService::new(Arc::new(repository.clone()));
    (repository, service)
}

// ============================================================================
// Processing
// ============================================================================

mod processing_tests {
    use super::*;

    #[tokio::test]
    async fn test_payment_is_recorded_as_success() {
        let (repository, service) = service();

        let id = service.process_payment(&request(7, "CUST1")).await.unwrap();
        let stored = repository
            .find_by_policy_id(PolicyId::new(7))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.status.as_str(), "SUCCESS");
        assert!(stored.transaction_id.starts_with("TXN-"));
        assert_eq!(stored.amount, dec!(12000.50));
    }

    #[tokio::test]
    async fn test_invalid_request_is_not_stored() {
        let (repository, service) = service();
        let mut r = request(7, "CUST1");
        r.amount = dec!(-1);

        let err = service.process_payment(&r).await.unwrap_err();

        assert_eq!(err.code(), "INVALID_AMOUNT");
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_second_payment_for_policy_conflicts() {
        let (repository, service) = service();
        service.process_payment(&request(7, "CUST1")).await.unwrap();

        let err = service.process_payment(&request(7, "CUST1")).await.unwrap_err();

        assert!(matches!(err, PaymentError::AlreadyExists(id) if id == PolicyId::new(7)));
        assert_eq!(err.code(), "PAYMENT_ALREADY_EXISTS");
        assert_eq!(err.kind().status_code(), 409);
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_payments_for_one_policy_store_exactly_one() {
        let (repository, service) = service();
        let service = Arc::new(service);

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.process_payment(&request(9, "CUST1")).await })
            })
            .collect();

        let mut successes = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert_eq!(e.code(), "PAYMENT_ALREADY_EXISTS"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal() {
        let (repository, service) = service();
        repository.fail_writes(true);

        let err = service.process_payment(&request(7, "CUST1")).await.unwrap_err();

        assert_eq!(err.code(), "PAYMENT_PROCESSING_FAILED");
        assert_eq!(err.public_message(), "An unexpected error occurred");
    }
}

// ============================================================================
// Lookups
// ============================================================================

mod lookup_tests {
    use super::*;

    #[tokio::test]
    async fn test_payment_by_policy_id() {
        let (_, service) = service();
        service.process_payment(&request(3, "CUST1")).await.unwrap();

        let view = service.payment_by_policy_id(PolicyId::new(3)).await.unwrap();

        assert_eq!(view.customer_id, "CUST1");
        assert_eq!(view.payment_mode, "NET_BANKING");
        assert_eq!(view.payment_type, "PREMIUM");
        assert_eq!(view.status, "SUCCESS");
    }

    #[tokio::test]
    async fn test_missing_payment_is_not_found() {
        let (_, service) = service();

        let err = service.payment_by_policy_id(PolicyId::new(3)).await.unwrap_err();
        assert_eq!(err.code(), "PAYMENT_NOT_FOUND");
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let port: PortError = service.payment_by_policy(PolicyId::new(3)).await.unwrap_err();
        assert!(port.is_not_found());
    }

    #[tokio::test]
    async fn test_payment_by_customer_returns_latest() {
        let (_, service) = service();
        service.process_payment(&request(1, "CUST1")).await.unwrap();
        service.process_payment(&request(2, "CUST2")).await.unwrap();
        let latest = service.process_payment(&request(3, "CUST1")).await.unwrap();

        let view = service.payment_by_customer_id("CUST1").await.unwrap();

        assert_eq!(view.payment_id, latest);
        assert_eq!(view.policy_id, PolicyId::new(3));
    }

    #[tokio::test]
    async fn test_blank_customer_id_is_rejected() {
        let (_, service) = service();
        let err = service.payment_by_customer_id("  ").await.unwrap_err();
        assert_eq!(err.code(), "INVALID_CUSTOMER_ID");
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (_, service) = service();
        let view = rt.block_on(async {
            service.process_payment(&request(4, "CUST9")).await.unwrap();
            service.payment_by_policy_id(PolicyId::new(4)).await.unwrap()
        });

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["policyNumber"], "POL-4");
        assert_eq!(json["referenceNumber"], "REF-4");
        assert!(json["transactionId"].as_str().unwrap().starts_with("TXN-"));
    }
}

// ============================================================================
// Events
// ============================================================================

mod event_tests {
    use super::*;

    #[tokio::test]
    async fn test_completed_event_is_published() {
        let publisher = Arc::new(RecordingPublisher::default());
        let service = PaymentService::with_publisher(
            Arc::new(InMemoryTransactionRepository::new()),
            publisher.clone(),
        );

        let id = service.process_payment(&request(5, "CUST1")).await.unwrap();

        let events = publisher.events.lock().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payment_id, id);
        assert_eq!(events[0].policy_id, Some(PolicyId::new(5)));
        assert_eq!(events[0].status, PaymentEventStatus::Completed);
    }

    #[tokio::test]
    async fn test_publish_failure_keeps_payment() {
        let publisher = Arc::new(RecordingPublisher {
            fail: true,
            ..Default::default()
        });
        let repository = InMemoryTransactionRepository::new();
        let service = PaymentService::with_publisher(Arc::new(repository.clone()), publisher);

        assert!(service.process_payment(&request(5, "CUST1")).await.is_ok());
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_does_not_publish() {
        let publisher = Arc::new(RecordingPublisher::default());
        let service = PaymentService::with_publisher(
            Arc::new(InMemoryTransactionRepository::new()),
            publisher.clone(),
        );
        service.process_payment(&request(5, "CUST1")).await.unwrap();
        let _ = service.process_payment(&request(5, "CUST1")).await;

        assert_eq!(publisher.events.lock().await.len(), 1);
    }
}

// ============================================================================
// Properties
// ============================================================================

mod property_tests {
    use super::*;
    use domain_billing::validation::validate_payment_request;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn non_positive_amounts_are_rejected(cents in -1_000_000i64..=0) {
            let mut r = request(1, "CUST1");
            r.amount = Decimal::new(cents, 2);
            prop_assert_eq!(validate_payment_request(&r).unwrap_err().code, "INVALID_AMOUNT");
        }

        #[test]
        fn positive_amounts_are_accepted(cents in 1i64..1_000_000_000) {
            let mut r = request(1, "CUST1");
            r.amount = Decimal::new(cents, 2);
            let payment = validate_payment_request(&r).unwrap();
            prop_assert_eq!(payment.amount, Decimal::new(cents, 2));
        }
    }

    #[test]
    fn test_each_processed_policy_gets_distinct_transaction_ids() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (repository, service) = service();
        rt.block_on(async {
            let mut ids = std::collections::HashSet::new();
            for policy in 1..=20 {
                service.process_payment(&request(policy, "CUST1")).await.unwrap();
                let t = repository
                    .find_by_policy_id(PolicyId::new(policy))
                    .await
                    .unwrap()
                    .unwrap();
                ids.insert(t.transaction_id);
            }
            assert_eq!(ids.len(), 20);
        });
    }
}
