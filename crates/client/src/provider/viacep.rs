//! ViaCEP adapter (`/ws/{code}/json/`).
//!
//! ViaCEP answers unknown codes with HTTP 200 and `{"erro": true}` (some
//! deployments send the string `"true"`), so the status alone is not enough.
//! Any truthy `erro` value marks the code as unknown.

use async_trait::async_trait;
use parcep_core::config::DEFAULT_VIACEP_BASE_URL;
use parcep_core::{AddressRecord, PostalCode, ProviderId};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{AddressProvider, ProviderError, endpoint, get_json};

/// Raw ViaCEP response.
#[derive(Debug, Default, Deserialize)]
pub struct ViaCepResponse {
    #[serde(default)]
    pub erro: Option<Value>,
    #[serde(default)]
    pub uf: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
}

impl ViaCepResponse {
    /// Whether the body carries a truthy `erro` flag.
    ///
    /// `false`, `0`, `""` and `null` are falsy; every other value, including
    /// the string `"false"`, is not.
    pub fn is_not_found(&self) -> bool {
        match &self.erro {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Some(Value::String(flag)) => !flag.is_empty(),
            Some(Value::Array(_) | Value::Object(_)) => true,
        }
    }

    /// Convert to an [`AddressRecord`], or `None` when flagged as not found.
    pub fn into_record(self, code: &PostalCode) -> Option<AddressRecord> {
        if self.is_not_found() {
            return None;
        }

        Some(AddressRecord {
            code: code.clone(),
            region: self.uf.unwrap_or_default(),
            city: self.localidade.unwrap_or_default(),
            street: self.logradouro.unwrap_or_default(),
            district: self.bairro.unwrap_or_default(),
            source_provider: ProviderId::ViaCep,
        })
    }
}

/// ViaCEP client.
#[derive(Debug, Clone)]
pub struct ViaCepProvider {
    http: Client,
    base_url: String,
}

impl ViaCepProvider {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    /// Client pointed at the public ViaCEP endpoint.
    pub fn with_default_base(http: Client) -> Self {
        Self::new(http, DEFAULT_VIACEP_BASE_URL)
    }

    pub fn url_for(&self, code: &PostalCode) -> String {
        endpoint(&self.base_url, &format!("ws/{code}/json/"))
    }
}

#[async_trait]
impl AddressProvider for ViaCepProvider {
    fn id(&self) -> ProviderId {
        ProviderId::ViaCep
    }

    async fn fetch(&self, code: &PostalCode) -> Result<Option<AddressRecord>, ProviderError> {
        let response: ViaCepResponse = get_json(&self.http, &self.url_for(code)).await?;
        Ok(response.into_record(code))
    }
}
