//! Typed read-through access on top of a [`CacheStore`]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::store::{CacheStore, InMemoryCacheStore, NoopCacheStore};

/// Cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Entry lifetime; entries live until invalidated when unset
    pub ttl_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: None,
        }
    }
}

/// Cache handle passed to every service that reads through or invalidates
#[derive(Clone)]
pub struct CacheLayer {
    store: Arc<dyn CacheStore>,
}

impl CacheLayer {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCacheStore::new()))
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopCacheStore))
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        match (config.enabled, config.ttl_secs) {
            (false, _) => Self::disabled(),
            (true, Some(secs)) => {
                Self::new(Arc::new(InMemoryCacheStore::with_ttl(Duration::from_secs(secs))))
            }
            (true, None) => Self::in_memory(),
        }
    }

    /// Returns the cached value, or loads, caches and returns it
    ///
    /// Errors from `load` are returned as-is and never cached. A value whose
    /// region was invalidated while it was loading is returned but not cached.
    pub async fn read_through<T, E, F, Fut>(&self, region: &str, key: &str, load: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.store.get(region, key) {
            match serde_json::from_value::<T>(cached) {
                Ok(value) => {
                    tracing::debug!(region, key, "cache hit");
                    return Ok(value);
                }
                Err(e) => tracing::warn!(region, key, error = %e, "discarding unreadable cache entry"),
            }
        }

        let generation = self.store.generation(region);
        let loaded = load().await?;

        match serde_json::to_value(&loaded) {
            Ok(value) => {
                if !self.store.put_if_current(region, key, value, generation) {
                    tracing::debug!(region, key, "region invalidated during load, not caching");
                }
            }
            Err(e) => tracing::warn!(region, key, error = %e, "value not cacheable"),
        }

        Ok(loaded)
    }

    /// Invalidates each named region wholesale
    pub fn invalidate(&self, regions: &[&str]) {
        for region in regions {
            self.store.invalidate_region(region);
            tracing::debug!(region, "cache region invalidated");
        }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }
}

impl std::fmt::Debug for CacheLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLayer").finish_non_exhaustive()
    }
}
