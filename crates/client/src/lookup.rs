//! Lookup orchestration: validate, cache, fan out, pick, store.
//!
//! ### Flow
//!
//! 1. Invalid input returns `invalid_format` before any cache or network access.
//! 2. A fresh cache entry is returned directly, with its measured read time.
//! 3. On a miss every selected provider is queried concurrently and the engine
//!    waits for all of them to settle. The first provider in priority order
//!    (BrasilAPI, then ViaCEP) that produced a record wins, regardless of which
//!    one answered first.
//! 4. The winner is written back to the cache. A failed write is logged and
//!    otherwise ignored.
//!
//! There are no retries. An optional per-provider timeout turns a hanging
//! provider into "no result" instead of stalling the lookup.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use parcep_core::{
    AddressCache, AddressRecord, AppConfig, Error, FailureReason, KeyValueStore, LookupHit, LookupOutcome, MemoryStore,
    PostalCode, PostalQuery, ProviderId, SqliteStore,
};

use crate::provider::{AddressProvider, BrasilApiProvider, ViaCepProvider, build_http_client};

/// Per-call lookup options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOptions {
    /// Upper bound for each provider call. `None` waits for the HTTP client.
    pub timeout: Option<Duration>,
    /// Restrict the lookup to these providers. `None` uses all of them.
    pub providers: Option<Vec<ProviderId>>,
    /// Read from and write to the cache.
    pub use_cache: bool,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self { timeout: None, providers: None, use_cache: true }
    }
}

impl LookupOptions {
    fn selects(&self, id: ProviderId) -> bool {
        self.providers.as_ref().is_none_or(|ids| ids.contains(&id))
    }
}

fn millis_since(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Postal code lookup engine.
#[derive(Clone)]
pub struct LookupEngine {
    providers: Vec<Arc<dyn AddressProvider>>,
    cache: AddressCache,
    defaults: LookupOptions,
}

impl std::fmt::Debug for LookupEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<ProviderId> = self.providers.iter().map(|p| p.id()).collect();
        f.debug_struct("LookupEngine")
            .field("providers", &ids)
            .field("cache", &self.cache)
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl LookupEngine {
    /// Engine with no providers yet.
    pub fn new(cache: AddressCache) -> Self {
        Self { providers: Vec::new(), cache, defaults: LookupOptions::default() }
    }

    /// Register a provider. Providers are kept in priority order.
    pub fn with_provider(mut self, provider: Arc<dyn AddressProvider>) -> Self {
        self.providers.push(provider);
        self.providers.sort_by_key(|p| p.id());
        self
    }

    /// Options used by [`Self::lookup`] and [`Self::lookup_many`].
    pub fn with_default_options(mut self, defaults: LookupOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Build an engine from application configuration.
    ///
    /// Opens the SQLite cache at `db_path` (or an in-memory store when unset
    /// or empty) and registers the configured providers.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let store: Arc<dyn KeyValueStore> = match config.db_path.as_deref() {
            Some(path) if !path.as_os_str().is_empty() => Arc::new(open_sqlite(path).await?),
            _ => Arc::new(MemoryStore::new()),
        };
        let cache = AddressCache::new(store).with_ttl(config.cache_ttl());
        let http = build_http_client(&config.user_agent, config.timeout())?;

        let mut engine = Self::new(cache).with_default_options(LookupOptions {
            timeout: Some(config.timeout()),
            ..LookupOptions::default()
        });
        for id in &config.providers {
            let provider: Arc<dyn AddressProvider> = match id {
                ProviderId::BrasilApi => Arc::new(BrasilApiProvider::new(http.clone(), &config.brasilapi_base_url)),
                ProviderId::ViaCep => Arc::new(ViaCepProvider::new(http.clone(), &config.viacep_base_url)),
            };
            engine = engine.with_provider(provider);
        }

        tracing::debug!(?engine, "lookup engine ready");
        Ok(engine)
    }

    pub fn cache(&self) -> &AddressCache {
        &self.cache
    }

    pub fn defaults(&self) -> &LookupOptions {
        &self.defaults
    }

    /// Registered providers, in priority order.
    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Look up a postal code with the engine's default options.
    pub async fn lookup(&self, query: &PostalQuery) -> LookupOutcome {
        self.lookup_with(query, &self.defaults).await
    }

    /// Look up a postal code.
    pub async fn lookup_with(&self, query: &PostalQuery, options: &LookupOptions) -> LookupOutcome {
        let Ok(code) = PostalCode::parse(query) else {
            tracing::debug!(%query, "rejected invalid postal code");
            return LookupOutcome::Failed(FailureReason::InvalidFormat);
        };

        if options.use_cache {
            let start = Instant::now();
            if let Some(record) = self.cache.get(&code).await {
                let elapsed_ms = millis_since(start);
                tracing::debug!(%code, elapsed_ms, "cache hit");
                return LookupOutcome::Found(LookupHit { record, served_from_cache: true, elapsed_ms });
            }
            tracing::debug!(%code, "cache miss");
        }

        let start = Instant::now();
        let Some(record) = self.query_providers(&code, options).await else {
            tracing::info!(%code, elapsed_ms = millis_since(start), "postal code not found");
            return LookupOutcome::Failed(FailureReason::NotFound);
        };

        if options.use_cache
            && let Err(e) = self.cache.put(&code, &record).await
        {
            tracing::warn!(%code, error = %e, "failed to cache lookup result");
        }

        let elapsed_ms = millis_since(start);
        tracing::info!(%code, provider = %record.source_provider, elapsed_ms, "postal code resolved");
        LookupOutcome::Found(LookupHit { record, served_from_cache: false, elapsed_ms })
    }

    /// Look up several postal codes concurrently.
    ///
    /// Outcomes are returned in input order.
    pub async fn lookup_many(&self, queries: &[PostalQuery]) -> Vec<LookupOutcome> {
        self.lookup_many_with(queries, &self.defaults).await
    }

    pub async fn lookup_many_with(&self, queries: &[PostalQuery], options: &LookupOptions) -> Vec<LookupOutcome> {
        join_all(queries.iter().map(|q| self.lookup_with(q, options))).await
    }

    /// Query every selected provider, wait for all, take the first record in priority order.
    async fn query_providers(&self, code: &PostalCode, options: &LookupOptions) -> Option<AddressRecord> {
        let selected = self.providers.iter().filter(|p| options.selects(p.id()));
        let results = join_all(selected.map(|p| query_one(p.as_ref(), code, options.timeout))).await;
        results.into_iter().flatten().next()
    }
}

async fn query_one(provider: &dyn AddressProvider, code: &PostalCode, timeout: Option<Duration>) -> Option<AddressRecord> {
    let Some(limit) = timeout else {
        return provider.lookup(code).await;
    };

    match tokio::time::timeout(limit, provider.lookup(code)).await {
        Ok(record) => record,
        Err(_) => {
            tracing::debug!(provider = %provider.id(), %code, ?limit, "provider timed out");
            None
        }
    }
}

async fn open_sqlite(path: &Path) -> Result<SqliteStore, Error> {
    tracing::debug!(path = %path.display(), "opening cache database");
    SqliteStore::open(path).await
}
