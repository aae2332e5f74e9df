//! Postal code lookup providers.
//!
//! Each upstream service sits behind the [`AddressProvider`] trait so the
//! lookup engine never sees provider-specific schemas or failures.
//!
//! ### Services
//!
//! - **BrasilAPI**: `GET {base}/cep/v1/{code}`
//! - **ViaCEP**: `GET {base}/ws/{code}/json/`, with an `erro` flag in the body
//!   for unknown codes
//!
//! ### Failure handling
//!
//! `fetch` reports what went wrong; `lookup` swallows it. Network errors,
//! non-2xx statuses and undecodable bodies all end up as `None`, so the engine
//! can join every provider without any of them failing the whole lookup.

pub mod brasilapi;
pub mod error;
pub mod viacep;

pub use brasilapi::BrasilApiProvider;
pub use error::ProviderError;
pub use viacep::ViaCepProvider;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use parcep_core::{AddressRecord, Error, PostalCode, ProviderId};
use reqwest::{Client, header};
use serde::de::DeserializeOwned;

/// A source of address records.
#[async_trait]
pub trait AddressProvider: Send + Sync {
    /// Which service this adapter talks to.
    fn id(&self) -> ProviderId;

    /// Query the service.
    ///
    /// `Ok(None)` means the service answered but does not know the code.
    async fn fetch(&self, code: &PostalCode) -> Result<Option<AddressRecord>, ProviderError>;

    /// Query the service, treating every failure as "no result".
    async fn lookup(&self, code: &PostalCode) -> Option<AddressRecord> {
        match self.fetch(code).await {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(provider = %self.id(), %code, error = %e, "provider lookup failed");
                None
            }
        }
    }
}

/// Build the HTTP client shared by all providers.
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .use_rustls_tls()
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(|e| Error::HttpClient(format!("failed to build HTTP client: {e}")))
}

/// GET `url` and decode a JSON body.
///
/// Non-2xx statuses are errors; the body is not inspected for them.
pub(crate) async fn get_json<T: DeserializeOwned>(http: &Client, url: &str) -> Result<T, ProviderError> {
    let start = Instant::now();

    let response = http.get(url).header(header::ACCEPT, "application/json").send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::HttpError { status: status.as_u16() });
    }

    let bytes = response.bytes().await?;
    let body = serde_json::from_slice(&bytes)?;

    tracing::debug!("GET {} -> {} in {:?} ({} bytes)", url, status, start.elapsed(), bytes.len());

    Ok(body)
}

/// Join a configured base URL and a path, tolerating a trailing slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Use a non-empty value, otherwise the fallback, otherwise an empty string.
pub(crate) fn first_non_empty(primary: Option<String>, fallback: Option<String>) -> String {
    primary
        .filter(|s| !s.is_empty())
        .or(fallback.filter(|s| !s.is_empty()))
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod testing {
    //! One-shot HTTP responder for adapter tests.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve a single canned response on a random local port.
    ///
    /// Returns the base URL and a receiver for the request line
    /// (e.g. `GET /ws/01310100/json/ HTTP/1.1`).
    pub async fn serve_once(status_line: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]);
            let _ = tx.send(request.lines().next().unwrap_or_default().to_string());
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        (format!("http://{addr}"), rx)
    }

    /// A base URL nothing listens on.
    pub async fn refused_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }
}
