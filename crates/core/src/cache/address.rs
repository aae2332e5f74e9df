//! Expiring address cache on top of a [`KeyValueStore`].
//!
//! Entries live under `cache_{code}` as `{"data": <record>, "timestamp": <epoch ms>}`.
//! Expiry is checked lazily on read: a stale entry is reported as absent but
//! stays in the store until the next write for that code overwrites it, or
//! until [`AddressCache::evict_expired`] is called.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::store::KeyValueStore;
use crate::Error;
use crate::query::PostalCode;
use crate::record::AddressRecord;

/// Prefix of every cache key.
pub const CACHE_KEY_PREFIX: &str = "cache_";

/// Default entry lifetime (15 days).
pub const DEFAULT_TTL: Duration = Duration::from_millis(15 * 24 * 60 * 60 * 1000);

/// Stored form of a cached record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(rename = "data")]
    pub record: AddressRecord,
    #[serde(rename = "timestamp")]
    pub stored_at_ms: i64,
}

impl CacheEntry {
    fn is_expired(&self, now_ms: i64, ttl_ms: i64) -> bool {
        now_ms.saturating_sub(self.stored_at_ms) >= ttl_ms
    }
}

/// Cache key for a postal code.
pub fn cache_key(code: &PostalCode) -> String {
    format!("{CACHE_KEY_PREFIX}{code}")
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Address cache with a fixed time-to-live.
#[derive(Clone)]
pub struct AddressCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl std::fmt::Debug for AddressCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressCache").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl AddressCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store, ttl: DEFAULT_TTL }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn ttl_ms(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }

    /// Fresh record for `code`, if any.
    ///
    /// Missing, expired and undecodable entries are all reported as `None`, as
    /// are store failures.
    pub async fn get(&self, code: &PostalCode) -> Option<AddressRecord> {
        self.get_at(code, now_ms()).await
    }

    /// [`Self::get`] evaluated at an explicit time.
    pub async fn get_at(&self, code: &PostalCode, now_ms: i64) -> Option<AddressRecord> {
        let key = cache_key(code);
        let raw = match self.store.load(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(%key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(%key, error = %e, "malformed cache entry, treating as miss");
                return None;
            }
        };

        if entry.is_expired(now_ms, self.ttl_ms()) {
            tracing::debug!(%key, stored_at_ms = entry.stored_at_ms, "cache entry expired");
            return None;
        }

        Some(entry.record)
    }

    /// Store `record` under `code`, stamped with the current time.
    pub async fn put(&self, code: &PostalCode, record: &AddressRecord) -> Result<(), Error> {
        self.put_at(code, record, now_ms()).await
    }

    /// [`Self::put`] with an explicit timestamp.
    pub async fn put_at(&self, code: &PostalCode, record: &AddressRecord, stored_at_ms: i64) -> Result<(), Error> {
        let entry = CacheEntry { record: record.clone(), stored_at_ms };
        let raw = serde_json::to_string(&entry)?;
        self.store.save(&cache_key(code), &raw).await
    }

    /// Delete expired and undecodable `cache_*` entries.
    ///
    /// Returns the number of deleted entries. Keys without the cache prefix
    /// are left alone.
    pub async fn evict_expired(&self) -> Result<u64, Error> {
        self.evict_expired_at(now_ms()).await
    }

    /// [`Self::evict_expired`] evaluated at an explicit time.
    pub async fn evict_expired_at(&self, now_ms: i64) -> Result<u64, Error> {
        let ttl_ms = self.ttl_ms();
        let mut evicted = 0;

        for key in self.store.keys().await? {
            if !key.starts_with(CACHE_KEY_PREFIX) {
                continue;
            }
            let Some(raw) = self.store.load(&key).await? else {
                continue;
            };
            let stale = match serde_json::from_str::<CacheEntry>(&raw) {
                Ok(entry) => entry.is_expired(now_ms, ttl_ms),
                Err(_) => true,
            };
            if stale && self.store.remove(&key).await? {
                evicted += 1;
            }
        }

        tracing::debug!(evicted, "evicted expired cache entries");
        Ok(evicted)
    }
}
