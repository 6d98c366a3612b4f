//! Shared HTTP client for upstream APIs
//!
//! Features:
//! - One connection pool for both upstream services
//! - TLS 1.3 via rustls
//! - Brotli, Gzip compression (auto-negotiated)
//! - Connect and request timeouts, no retries

use std::time::Duration;

use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::UpstreamError;

/// HTTP client wrapper that decodes JSON into typed payloads.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Create a client using the timeouts from `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(concat!("pmstream/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .use_rustls_tls()
            .brotli(true)
            .gzip(true)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` and decode the body as `T`.
    ///
    /// Transport errors, non-success statuses and undecodable bodies map to
    /// the matching [`UpstreamError`] variant. `endpoint` is the label used
    /// in errors and logs, so callers can keep secrets out of it.
    #[instrument(skip(self, url, endpoint), fields(endpoint = %endpoint))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        endpoint: &str,
    ) -> Result<T, UpstreamError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(endpoint, e))?;

        let status = response.status();
        debug!(status = %status, "Response received");
        if !status.is_success() {
            return Err(UpstreamError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::from_reqwest(endpoint, e))?;
        serde_json::from_slice(&body).map_err(|e| UpstreamError::malformed(endpoint, &e))
    }
}

/// One-shot HTTP/1.1 responders for exercising real client code offline.
#[cfg(test)]
pub(crate) mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    pub const SERVICE_UNAVAILABLE: &str =
        "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
    pub const TRUNCATED_JSON: &str = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
         Content-Length: 1\r\nConnection: close\r\n\r\n{";

    /// Accept one connection, answer it with `response`, and return the
    /// server's base URL (`http://127.0.0.1:<port>`).
    pub async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }
}
