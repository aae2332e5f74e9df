//! BrasilAPI adapter (`/cep/v1/{code}`).

use async_trait::async_trait;
use parcep_core::config::DEFAULT_BRASILAPI_BASE_URL;
use parcep_core::{AddressRecord, PostalCode, ProviderId};
use reqwest::Client;
use serde::Deserialize;

use super::{AddressProvider, ProviderError, endpoint, first_non_empty, get_json};

/// Raw BrasilAPI CEP response.
///
/// Older payloads use `address`/`district` where newer ones use
/// `street`/`neighborhood`.
#[derive(Debug, Default, Deserialize)]
pub struct BrasilApiResponse {
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
}

impl BrasilApiResponse {
    /// Convert to an [`AddressRecord`] for the requested code.
    pub fn into_record(self, code: &PostalCode) -> AddressRecord {
        AddressRecord {
            code: code.clone(),
            region: self.state.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            street: first_non_empty(self.street, self.address),
            district: first_non_empty(self.neighborhood, self.district),
            source_provider: ProviderId::BrasilApi,
        }
    }
}

/// BrasilAPI client.
#[derive(Debug, Clone)]
pub struct BrasilApiProvider {
    http: Client,
    base_url: String,
}

impl BrasilApiProvider {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    /// Client pointed at the public BrasilAPI endpoint.
    pub fn with_default_base(http: Client) -> Self {
        Self::new(http, DEFAULT_BRASILAPI_BASE_URL)
    }

    pub fn url_for(&self, code: &PostalCode) -> String {
        endpoint(&self.base_url, &format!("cep/v1/{code}"))
    }
}

#[async_trait]
impl AddressProvider for BrasilApiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::BrasilApi
    }

    async fn fetch(&self, code: &PostalCode) -> Result<Option<AddressRecord>, ProviderError> {
        let response: BrasilApiResponse = get_json(&self.http, &self.url_for(code)).await?;
        Ok(Some(response.into_record(code)))
    }
}
