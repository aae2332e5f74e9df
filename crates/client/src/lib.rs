//! Client code for parcep.
//!
//! This crate provides the upstream lookup providers and the engine that
//! combines them with the address cache.

pub mod lookup;
pub mod provider;

pub use lookup::{LookupEngine, LookupOptions};
pub use provider::{AddressProvider, BrasilApiProvider, ProviderError, ViaCepProvider, build_http_client};
