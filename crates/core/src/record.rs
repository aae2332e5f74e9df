//! Address records returned by lookup providers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::query::PostalCode;

/// Identifier of an upstream lookup service.
///
/// Declaration order is the priority order used when several providers
/// return a record for the same code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// BrasilAPI (`/cep/v1/{code}`).
    BrasilApi,
    /// ViaCEP (`/ws/{code}/json/`).
    ViaCep,
}

impl ProviderId {
    /// All providers, in priority order.
    pub const ALL: [ProviderId; 2] = [ProviderId::BrasilApi, ProviderId::ViaCep];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::BrasilApi => "brasilapi",
            ProviderId::ViaCep => "viacep",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brasilapi" => Ok(ProviderId::BrasilApi),
            "viacep" => Ok(ProviderId::ViaCep),
            other => Err(Error::InvalidInput(format!("unknown provider: {other}"))),
        }
    }
}

/// A resolved address.
///
/// Text fields a provider leaves out are empty strings, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub code: PostalCode,
    pub region: String,
    pub city: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub district: String,
    pub source_provider: ProviderId,
}
