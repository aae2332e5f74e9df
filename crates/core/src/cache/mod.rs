//! Address cache and its storage backends.
//!
//! This module provides:
//!
//! - A [`KeyValueStore`] trait with in-memory and SQLite implementations
//! - [`AddressCache`], which stores lookup results with a 15-day TTL
//! - Lazy expiry on read plus an explicit evict-by-age pass

pub mod address;
pub mod connection;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use address::{AddressCache, CACHE_KEY_PREFIX, CacheEntry, DEFAULT_TTL, cache_key};
pub use connection::SqliteStore;
pub use store::{KeyValueStore, MemoryStore};
