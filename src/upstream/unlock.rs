//! Premium link unlocking
//!
//! [`LinkUnlocker`] owns the credential. Without one it never touches the
//! network and every unlock reports [`UnlockOutcome::Disabled`]. With one it
//! asks the [`UnlockService`] (`GET {base}/link/unlock?agent=&apikey=&link=`)
//! and turns anything but a successful payload carrying a link into
//! [`UnlockOutcome::Rejected`], which callers treat as "use the raw URL".

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::error::UpstreamError;
use crate::http_client::ApiClient;
use crate::model::UnlockedLink;
use crate::quality::classify;
use crate::upstream::content_api::{endpoint_url, parse_base};

/// Host label used when the unlock payload does not name one.
pub const DEFAULT_HOST: &str = "Premium";

/// Parameters of one unlock call.
#[derive(Clone, Copy)]
pub struct UnlockRequest<'a> {
    pub agent: &'a str,
    pub api_key: &'a str,
    pub link: &'a str,
}

// Keep the credential out of debug output.
impl std::fmt::Debug for UnlockRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnlockRequest")
            .field("agent", &self.agent)
            .field("link", &self.link)
            .finish_non_exhaustive()
    }
}

/// Raw unlock API payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnlockResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Option<UnlockData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnlockData {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub filesize: Option<serde_json::Number>,
}

/// Link-unlocking API.
#[async_trait]
pub trait UnlockService: Send + Sync {
    async fn unlock(&self, request: UnlockRequest<'_>) -> Result<UnlockResponse, UpstreamError>;
}

/// Result of an unlock attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// Premium link obtained.
    Unlocked(UnlockedLink),
    /// No credential configured; nothing was requested.
    Disabled,
    /// The service was asked but gave no usable link.
    Rejected { reason: String },
}

impl UnlockOutcome {
    pub fn into_link(self) -> Option<UnlockedLink> {
        match self {
            Self::Unlocked(link) => Some(link),
            Self::Disabled | Self::Rejected { .. } => None,
        }
    }
}

/// Credential-aware front for an [`UnlockService`].
#[derive(Clone)]
pub struct LinkUnlocker {
    service: Arc<dyn UnlockService>,
    api_key: Option<String>,
    agent: String,
}

impl LinkUnlocker {
    pub fn new(service: Arc<dyn UnlockService>, api_key: Option<String>, agent: &str) -> Self {
        Self {
            service,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            agent: agent.to_string(),
        }
    }

    /// Build from config; the key comes from [`Config::premium_key`].
    pub fn from_config(service: Arc<dyn UnlockService>, config: &Config) -> Self {
        Self::new(service, config.premium_key().map(str::to_string), &config.agent)
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Try to exchange `raw_url` for a premium link.
    pub async fn unlock(&self, raw_url: &str) -> UnlockOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            return UnlockOutcome::Disabled;
        };

        let request = UnlockRequest {
            agent: &self.agent,
            api_key,
            link: raw_url,
        };
        let outcome = match self.service.unlock(request).await {
            Ok(response) => interpret(response),
            Err(e) => UnlockOutcome::Rejected {
                reason: e.to_string(),
            },
        };

        match &outcome {
            UnlockOutcome::Unlocked(link) => {
                debug!(host = %link.host, quality = %link.quality, "Link unlocked");
            }
            UnlockOutcome::Rejected { reason } => {
                debug!(reason = %reason, "Unlock rejected, falling back to direct link");
            }
            UnlockOutcome::Disabled => {}
        }
        outcome
    }
}

impl std::fmt::Debug for LinkUnlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkUnlocker")
            .field("enabled", &self.is_enabled())
            .field("agent", &self.agent)
            .finish_non_exhaustive()
    }
}

/// Map an unlock payload to an outcome.
fn interpret(response: UnlockResponse) -> UnlockOutcome {
    if response.status != "success" {
        return UnlockOutcome::Rejected {
            reason: format!("status {:?}", response.status),
        };
    }
    let Some(data) = response.data else {
        return UnlockOutcome::Rejected {
            reason: "success without data".to_string(),
        };
    };
    let Some(url) = data.link.filter(|l| !l.is_empty()) else {
        return UnlockOutcome::Rejected {
            reason: "success without link".to_string(),
        };
    };

    let filename = data.filename.unwrap_or_default();
    let host = data
        .host
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let size_bytes = data.filesize.as_ref().map_or(0, number_to_bytes);

    UnlockOutcome::Unlocked(UnlockedLink {
        url,
        quality: classify(&filename),
        filename,
        host,
        size_bytes,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn number_to_bytes(n: &serde_json::Number) -> u64 {
    n.as_u64()
        .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        .unwrap_or(0)
}

/// HTTP implementation of [`UnlockService`].
pub struct UnlockApiClient {
    http: ApiClient,
    base: Url,
}

impl UnlockApiClient {
    /// # Errors
    ///
    /// Returns an error if `base` is not an absolute http(s) URL.
    pub fn new(http: ApiClient, base: &str) -> Result<Self> {
        Ok(Self {
            http,
            base: parse_base(base)?,
        })
    }

    fn unlock_url(&self, request: UnlockRequest<'_>) -> Url {
        let mut url = endpoint_url(&self.base, &["link", "unlock"]);
        url.query_pairs_mut()
            .append_pair("agent", request.agent)
            .append_pair("apikey", request.api_key)
            .append_pair("link", request.link);
        url
    }
}

#[async_trait]
impl UnlockService for UnlockApiClient {
    #[instrument(skip(self, request), fields(agent = %request.agent))]
    async fn unlock(&self, request: UnlockRequest<'_>) -> Result<UnlockResponse, UpstreamError> {
        let url = self.unlock_url(request);
        // Label by path only; the query carries the credential.
        let endpoint = url.path().to_string();
        self.http.get_json(url.as_str(), &endpoint).await
    }
}
