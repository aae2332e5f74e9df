//! Core types and shared functionality for parcep.
//!
//! This crate provides:
//! - Postal code input, validation and normalization
//! - Address records and lookup outcomes
//! - Expiring address cache with in-memory and SQLite stores
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod outcome;
pub mod query;
pub mod record;

pub use cache::{AddressCache, KeyValueStore, MemoryStore, SqliteStore};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use outcome::{FailureReason, LookupHit, LookupOutcome};
pub use query::{PostalCode, PostalQuery, is_valid_format, is_valid_json, normalize};
pub use record::{AddressRecord, ProviderId};
