//! Tests for the read-through cache layer

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use infra_cache::{regions, CacheConfig, CacheLayer, CacheStore, InMemoryCacheStore};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Sample {
    id: i64,
    name: String,
}

fn sample(id: i64) -> Sample {
    Sample {
        id,
        name: format!("sample-{}", id),
    }
}

// ============================================================================
// Read-through
// ============================================================================

mod read_through_tests {
    use super::*;

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = CacheLayer::in_memory();
        let loads = AtomicUsize::new(0);

        for _ in 0..3 {
            let value: Result<Sample, String> = cache
                .read_through(regions::POLICIES, "policy-by-id:1", || async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(sample(1))
                })
                .await;
            assert_eq!(value.unwrap(), sample(1));
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = CacheLayer::in_memory();
        let loads = AtomicUsize::new(0);

        for _ in 0..2 {
            let value: Result<Sample, String> = cache
                .read_through(regions::CLAIMS, "claim-9", || async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Err("missing".to_string())
                })
                .await;
            assert!(value.is_err());
        }

        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidation_forces_reload() {
        let cache = CacheLayer::in_memory();
        let loads = AtomicUsize::new(0);
        let read = || {
            cache.read_through(regions::PRODUCTS, "all-products", || async {
                let n = loads.fetch_add(1, Ordering::SeqCst) as i64;
                Ok::<_, String>(vec![sample(n)])
            })
        };

        assert_eq!(read().await.unwrap()[0].id, 0);
        assert_eq!(read().await.unwrap()[0].id, 0);

        cache.invalidate(&[regions::PRODUCTS, regions::PRODUCT_BY_ID]);

        assert_eq!(read().await.unwrap()[0].id, 1);
    }

    #[tokio::test]
    async fn test_value_loaded_across_an_invalidation_is_not_cached() {
        let store = Arc::new(InMemoryCacheStore::new());
        let cache = CacheLayer::new(store.clone());

        let value: Result<Sample, String> = cache
            .read_through(regions::POLICIES, "policy-by-id:2", || async {
                // A write lands while the owner is being read
                cache.invalidate(&[regions::POLICIES]);
                Ok(sample(2))
            })
            .await;

        assert_eq!(value.unwrap(), sample(2));
        assert!(store.get(regions::POLICIES, "policy-by-id:2").is_none());
    }

    #[tokio::test]
    async fn test_unreadable_entry_is_treated_as_miss() {
        let store = Arc::new(InMemoryCacheStore::new());
        store.put(regions::CLAIMS, "claim-1", serde_json::json!("not a sample"));
        let cache = CacheLayer::new(store);

        let value: Result<Sample, String> = cache
            .read_through(regions::CLAIMS, "claim-1", || async { Ok(sample(1)) })
            .await;

        assert_eq!(value.unwrap(), sample(1));
    }
}

// ============================================================================
// Configuration
// ============================================================================

mod config_tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_cache_always_loads() {
        let cache = CacheLayer::from_config(&CacheConfig {
            enabled: false,
            ttl_secs: None,
        });
        let loads = AtomicUsize::new(0);

        for _ in 0..2 {
            let _: Result<Sample, String> = cache
                .read_through(regions::POLICIES, "k", || async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(sample(1))
                })
                .await;
        }

        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_default_config_is_enabled_without_ttl() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert!(config.ttl_secs.is_none());
    }
}
