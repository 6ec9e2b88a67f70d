//! Explicit computation cache for the signal engine.
//!
//! Keyed by (ticker, window, as-of-date): a new trading day, a different
//! window, or a different ticker misses the cache and triggers a fresh
//! provider fetch. Within a key the engine is deterministic, so hits serve
//! both the metrics view and the chart without re-fetching history.

use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{PriceBar, SignalLevels};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub ticker: String,
    pub window: usize,
    pub as_of: NaiveDate,
}

impl CacheKey {
    pub fn new(ticker: &str, window: usize, as_of: NaiveDate) -> Self {
        Self {
            ticker: ticker.to_uppercase(),
            window,
            as_of,
        }
    }
}

/// One cached computation: the levels plus the series they were derived
/// from, kept so the chart endpoint can be served without a second fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSnapshot {
    pub levels: SignalLevels,
    pub series: Vec<PriceBar>,
}

#[derive(Default)]
pub struct SignalCache {
    inner: RwLock<HashMap<CacheKey, SignalSnapshot>>,
}

impl SignalCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &CacheKey) -> Option<SignalSnapshot> {
        self.inner.read().await.get(key).cloned()
    }

    /// Insert a computation, evicting snapshots from earlier trading days.
    /// Only the newest as-of date can ever be served again, so stale keys
    /// are dropped rather than left resident with their full series.
    pub async fn insert(&self, key: CacheKey, snapshot: SignalSnapshot) {
        let mut inner = self.inner.write().await;
        inner.retain(|k, _| k.as_of >= key.as_of);
        inner.insert(key, snapshot);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
