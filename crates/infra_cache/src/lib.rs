//! Cache Layer
//!
//! A read-through cache keyed by `(region, key)`. Reads consult the cache
//! before loading from the owner; writes to an entity type invalidate the
//! whole region that caches it, never a single key.
//!
//! Values are stored as `serde_json::Value` so one store can hold any view
//! type, and [`CacheLayer`] restores the typed value on a hit.

pub mod layer;
pub mod regions;
pub mod store;

pub use layer::{CacheConfig, CacheLayer};
pub use store::{CacheStore, InMemoryCacheStore, NoopCacheStore};
