//! Cache module for yearly observation data
//!
//! Two tiers: a file-per-key [`CacheStore`] that holds historical years
//! permanently, and an in-memory [`FreshnessCache`] that holds the current and
//! previous year for a bounded time. Both degrade to a miss on any failure.

mod freshness;
mod store;

pub use freshness::FreshnessCache;
pub use store::{CacheError, CacheStore, StaticSource};
