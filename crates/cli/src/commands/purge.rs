//! `parcep purge` implementation.
//!
//! Lookups never delete stale entries on their own; this command does.

use parcep_core::{AddressCache, Error};
use serde::Serialize;

/// Output from the purge command.
#[derive(Debug, Clone, Serialize)]
pub struct PurgeOutput {
    /// Number of cache entries removed.
    pub evicted: u64,
}

/// Implementation of the purge command.
pub async fn purge_impl(cache: &AddressCache) -> Result<PurgeOutput, Error> {
    let evicted = cache.evict_expired().await?;
    tracing::info!(evicted, "purged expired cache entries");
    Ok(PurgeOutput { evicted })
}
