//! Cache stores

use std::collections::HashMap;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;

/// Explicit cache-aside interface
///
/// Every region carries a generation counter that moves on each
/// invalidation. A loader that read the generation before going to the
/// owner can then refuse to cache a value that a concurrent write has
/// already made stale.
pub trait CacheStore: Send + Sync + 'static {
    fn get(&self, region: &str, key: &str) -> Option<Value>;

    fn put(&self, region: &str, key: &str, value: Value);

    /// Drops every entry of the region in one step
    fn invalidate_region(&self, region: &str);

    fn generation(&self, region: &str) -> u64;

    /// Stores the value only if the region is still at `generation`
    fn put_if_current(&self, region: &str, key: &str, value: Value, generation: u64) -> bool;
}

#[derive(Debug)]
struct CachedEntry {
    value: Value,
    stored_at: Instant,
}

#[derive(Debug, Default)]
struct Region {
    generation: u64,
    entries: HashMap<String, CachedEntry>,
}

/// In-process store shared by all requests
///
/// Each region lives under a single map shard lock, so clearing a region is
/// atomic with respect to concurrent reads and writes of that region.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    regions: DashMap<String, Region>,
    ttl: Option<Duration>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries older than `ttl` are treated as misses
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            regions: DashMap::new(),
            ttl: Some(ttl),
        }
    }

    /// Number of live entries in a region
    pub fn entry_count(&self, region: &str) -> usize {
        self.regions
            .get(region)
            .map(|r| r.entries.values().filter(|e| !self.is_expired(e)).count())
            .unwrap_or(0)
    }

    /// Number of entries held in memory, expired ones included
    pub fn resident_count(&self, region: &str) -> usize {
        self.regions.get(region).map(|r| r.entries.len()).unwrap_or(0)
    }

    fn is_expired(&self, entry: &CachedEntry) -> bool {
        self.ttl
            .map(|ttl| entry.stored_at.elapsed() >= ttl)
            .unwrap_or(false)
    }

    fn entry(value: Value) -> CachedEntry {
        CachedEntry {
            value,
            stored_at: Instant::now(),
        }
    }

    /// Inserts into the region, first dropping whatever has expired
    fn insert(&self, region: &mut Region, key: &str, value: Value) {
        if self.ttl.is_some() {
            region.entries.retain(|_, entry| !self.is_expired(entry));
        }
        region.entries.insert(key.to_string(), Self::entry(value));
    }
}

impl CacheStore for InMemoryCacheStore {
    fn get(&self, region: &str, key: &str) -> Option<Value> {
        let region = self.regions.get(region)?;
        let entry = region.entries.get(key)?;
        if self.is_expired(entry) {
            return None;
        }
        Some(entry.value.clone())
    }

    fn put(&self, region: &str, key: &str, value: Value) {
        let mut region = self.regions.entry(region.to_string()).or_default();
        self.insert(&mut region, key, value);
    }

    fn invalidate_region(&self, region: &str) {
        let mut region = self.regions.entry(region.to_string()).or_default();
        region.generation += 1;
        region.entries.clear();
    }

    fn generation(&self, region: &str) -> u64 {
        self.regions.get(region).map(|r| r.generation).unwrap_or(0)
    }

    fn put_if_current(&self, region: &str, key: &str, value: Value, generation: u64) -> bool {
        let mut region = self.regions.entry(region.to_string()).or_default();
        if region.generation != generation {
            return false;
        }
        self.insert(&mut region, key, value);
        true
    }
}

/// Store that never holds anything, used when caching is switched off
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCacheStore;

impl CacheStore for NoopCacheStore {
    fn get(&self, _region: &str, _key: &str) -> Option<Value> {
        None
    }

    fn put(&self, _region: &str, _key: &str, _value: Value) {}

    fn invalidate_region(&self, _region: &str) {}

    fn generation(&self, _region: &str) -> u64 {
        0
    }

    fn put_if_current(&self, _region: &str, _key: &str, _value: Value, _generation: u64) -> bool {
        false
    }
}
