//! In-memory cache for data that may still change upstream
//!
//! Each entry remembers when it was fetched and stops being served once it is
//! older than the configured window. The cache starts empty on every process
//! start.

use chrono::{Duration, NaiveDateTime};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct FreshEntry<T> {
    value: T,
    fetched_at: NaiveDateTime,
}

/// Per-year values with a last-fetch timestamp and a maximum age
#[derive(Debug)]
pub struct FreshnessCache<T> {
    window: Duration,
    entries: RwLock<HashMap<i32, FreshEntry<T>>>,
}

impl<T: Clone> FreshnessCache<T> {
    /// Creates an empty cache whose entries expire after `window`
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the value for `year` if it was fetched less than one window ago
    pub async fn get(&self, year: i32, now: NaiveDateTime) -> Option<T> {
        let entries = self.entries.read().await;
        let entry = entries.get(&year)?;
        if now.signed_duration_since(entry.fetched_at) < self.window {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Stores `value` for `year`, replacing any previous entry
    pub async fn put(&self, year: i32, value: T, fetched_at: NaiveDateTime) {
        self.entries
            .write()
            .await
            .insert(year, FreshEntry { value, fetched_at });
    }

    /// Drops every entry for a year other than `keep`
    pub async fn retain_years(&self, keep: &[i32]) {
        self.entries
            .write()
            .await
            .retain(|year, _| keep.contains(year));
    }
}
