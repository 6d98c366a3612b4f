//! HTTP client for the catalog/media API
//!
//! Endpoints:
//! - `GET {base}/matches` and `GET {base}/matches/{category}`: catalog entries
//! - `GET {base}/stream/{source}/{id}`: media items for one source

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::error::UpstreamError;
use crate::http_client::ApiClient;
use crate::model::{CatalogEntry, MediaItem, SourceRef};
use crate::upstream::ContentService;

/// Display category meaning "no category filter".
pub const ALL_CATEGORY: &str = "all";

/// Display category → upstream path. Unlisted categories pass through.
const CATEGORY_PATHS: &[(&str, &str)] = &[
    ("today", "all-today"),
    ("popular", "all/popular"),
    ("soccer", "football"),
    ("nfl", "american-football"),
    ("f1", "motor-sports"),
];

pub struct ContentApiClient {
    http: ApiClient,
    base: Url,
}

impl ContentApiClient {
    /// # Errors
    ///
    /// Returns an error if `base` is not an absolute http(s) URL.
    pub fn new(http: ApiClient, base: &str) -> Result<Self> {
        Ok(Self {
            http,
            base: parse_base(base)?,
        })
    }

    /// Upstream path segments for a display category.
    fn category_segments(category: &str) -> Vec<&str> {
        match CATEGORY_PATHS.iter().find(|(name, _)| *name == category) {
            Some((_, path)) => path.split('/').collect(),
            None => vec![category],
        }
    }

    fn catalog_url(&self, category: &str) -> Url {
        let mut segments = vec!["matches"];
        if category != ALL_CATEGORY {
            segments.extend(Self::category_segments(category));
        }
        endpoint_url(&self.base, &segments)
    }

    fn media_url(&self, source: &SourceRef) -> Url {
        endpoint_url(&self.base, &["stream", source.source.as_str(), source.id.as_str()])
    }

    /// Resolve site-relative posters (`/api/images/...`) against the base.
    fn resolve_poster(&self, poster: &str) -> String {
        if poster.starts_with('/') {
            self.base
                .join(poster)
                .map_or_else(|_| poster.to_string(), String::from)
        } else {
            poster.to_string()
        }
    }
}

#[async_trait]
impl ContentService for ContentApiClient {
    #[instrument(skip(self))]
    async fn list_entries(&self, category: &str) -> Result<Vec<CatalogEntry>, UpstreamError> {
        let url = self.catalog_url(category);
        debug!(url = %url, "Fetching catalog");

        let mut entries: Vec<CatalogEntry> = self.http.get_json(url.as_str(), url.path()).await?;
        for entry in &mut entries {
            if let Some(poster) = entry.poster.take() {
                entry.poster = Some(self.resolve_poster(&poster));
            }
        }
        Ok(entries)
    }

    #[instrument(skip(self, source), fields(source = %source.source, id = %source.id))]
    async fn list_media(&self, source: &SourceRef) -> Result<Vec<MediaItem>, UpstreamError> {
        let url = self.media_url(source);
        debug!(url = %url, "Fetching media");

        let items: Vec<MediaPayload> = self.http.get_json(url.as_str(), url.path()).await?;
        Ok(items
            .into_iter()
            .map(|item| MediaItem {
                url: item.url,
                quality: item.quality,
                source: source.source.clone(),
            })
            .collect())
    }
}

/// Parse and validate an upstream base URL.
pub(crate) fn parse_base(base: &str) -> Result<Url> {
    let url = Url::parse(base).with_context(|| format!("invalid upstream base URL: {base}"))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!("upstream base URL must be http(s): {base}"));
    }
    Ok(url)
}

/// Append percent-encoded path segments to `base`.
pub(crate) fn endpoint_url(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

// Serde structure for media listing items
#[derive(Debug, Deserialize)]
struct MediaPayload {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    quality: Option<String>,
}
