//! Resolution pipeline: catalog listing and stream resolution.
//!
//! Both operations are stateless and never fail from the caller's point of
//! view. Upstream problems shrink the result (down to an empty list) but are
//! only visible in logs.
//!
//! # Example
//!
//! ```rust,no_run
//! use pmstream::{Config, ResolutionPipeline};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pipeline = ResolutionPipeline::from_config(&Config::load()?)?;
//! let response = pipeline.streams("tv", "pm-content:all:42").await;
//! for stream in &response.streams {
//!     println!("{} {}", stream.title, stream.url);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::http_client::ApiClient;
use crate::model::{
    CatalogEntry, CatalogResponse, CompositeId, EntryId, MetaPreview, SourceRef, StreamOption,
    StreamResponse,
};
use crate::rank::rank;
use crate::upstream::content_api::ALL_CATEGORY;
use crate::upstream::{
    ContentApiClient, ContentFetcher, ContentService, LinkUnlocker, UnlockApiClient, UnlockOutcome,
};

/// Content type served by the catalog and stream operations.
pub const CATALOG_TYPE: &str = "tv";
/// The single catalog this pipeline serves.
pub const CATALOG_ID: &str = "pm-content-live";
/// First field of every composite id.
pub const ID_PREFIX: &str = "pm-content";
/// Maximum number of display items per catalog response.
pub const CATALOG_LIMIT: usize = 15;

const DESCRIPTION_TEMPLATE: &str = "Live event";
const FALLBACK_NAME: &str = "Live Event";
const POSTER_SHAPE: &str = "landscape";

/// Optional catalog filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogExtra {
    #[serde(default, alias = "genre")]
    pub category: Option<String>,
}

impl CatalogExtra {
    pub fn category(category: &str) -> Self {
        Self {
            category: Some(category.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolutionPipeline {
    content: ContentFetcher,
    unlocker: LinkUnlocker,
}

impl ResolutionPipeline {
    pub fn new(content: Arc<dyn ContentService>, unlocker: LinkUnlocker) -> Self {
        Self {
            content: ContentFetcher::new(content),
            unlocker,
        }
    }

    /// Wire the HTTP clients described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or a base URL is
    /// invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = ApiClient::new(config)?;
        let content = ContentApiClient::new(http.clone(), &config.api_base)?;
        let unlock = UnlockApiClient::new(http, &config.unlock_base)?;
        Ok(Self::new(
            Arc::new(content),
            LinkUnlocker::from_config(Arc::new(unlock), config),
        ))
    }

    pub fn premium_enabled(&self) -> bool {
        self.unlocker.is_enabled()
    }

    /// List display items for the catalog, at most [`CATALOG_LIMIT`].
    #[instrument(skip(self, extra), fields(category = ?extra.category))]
    pub async fn catalog(&self, kind: &str, id: &str, extra: &CatalogExtra) -> CatalogResponse {
        if kind != CATALOG_TYPE || id != CATALOG_ID {
            debug!("Unsupported catalog requested");
            return CatalogResponse::default();
        }

        let category = extra
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(ALL_CATEGORY);

        let entries = self.content.fetch_catalog(category).await;
        let total = entries.len();
        let metas: Vec<MetaPreview> = entries
            .iter()
            .map(|entry| to_meta(entry, category))
            .take(CATALOG_LIMIT)
            .collect();

        info!(category, total, returned = metas.len(), "Catalog resolved");
        CatalogResponse { metas }
    }

    /// Resolve a composite id into ranked stream options.
    #[instrument(skip(self))]
    pub async fn streams(&self, kind: &str, id: &str) -> StreamResponse {
        if kind != CATALOG_TYPE || !id.starts_with(&format!("{ID_PREFIX}:")) {
            debug!("Unsupported stream id");
            return StreamResponse::default();
        }
        let Some(composite) = CompositeId::parse(id) else {
            debug!("Malformed composite id");
            return StreamResponse::default();
        };

        let entries = self.content.fetch_catalog(&composite.category).await;
        let Some(entry) = find_entry(entries, &composite.raw_id) else {
            debug!(raw_id = %composite.raw_id, "Entry not found");
            return StreamResponse::default();
        };
        if entry.sources.is_empty() {
            debug!(raw_id = %composite.raw_id, "Entry has no sources");
            return StreamResponse::default();
        }

        // Sequential on purpose: output order follows source order, then
        // media order within a source.
        let mut options = Vec::new();
        for source in &entry.sources {
            options.extend(self.resolve_source(source).await);
        }

        let streams = rank(options);
        info!(
            sources = entry.sources.len(),
            streams = streams.len(),
            premium = streams.iter().filter(|s| s.is_premium()).count(),
            "Streams resolved"
        );
        StreamResponse { streams }
    }

    /// Stream options for one source. A failing source contributes nothing.
    async fn resolve_source(&self, source: &SourceRef) -> Vec<StreamOption> {
        let items = self.content.fetch_media(source).await;
        let mut options = Vec::with_capacity(items.len());

        for item in &items {
            let Some(url) = item.url.as_deref().filter(|u| !u.is_empty()) else {
                continue;
            };
            let option = match self.unlocker.unlock(url).await {
                UnlockOutcome::Unlocked(link) => StreamOption::premium(&link),
                UnlockOutcome::Disabled | UnlockOutcome::Rejected { .. } => {
                    StreamOption::direct(url, item)
                }
            };
            options.push(option);
        }
        options
    }
}

/// Locate the entry whose id, compared as a string, equals `raw_id`.
fn find_entry(entries: Vec<CatalogEntry>, raw_id: &str) -> Option<CatalogEntry> {
    entries
        .into_iter()
        .find(|entry| entry.id.as_ref().and_then(EntryId::key).as_deref() == Some(raw_id))
}

/// Map a catalog entry to its display item.
fn to_meta(entry: &CatalogEntry, category: &str) -> MetaPreview {
    let raw_id = entry
        .id
        .as_ref()
        .and_then(EntryId::key)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let name = entry
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| entry.teams.as_ref().and_then(|teams| teams.label()))
        .unwrap_or_else(|| FALLBACK_NAME.to_string());

    let description = match entry.category.as_deref().filter(|c| !c.is_empty()) {
        Some(text) => format!("{DESCRIPTION_TEMPLATE} - {text}"),
        None => DESCRIPTION_TEMPLATE.to_string(),
    };

    MetaPreview {
        id: CompositeId::new(ID_PREFIX, category, &raw_id).to_string(),
        kind: CATALOG_TYPE.to_string(),
        name,
        poster: entry.poster.clone(),
        poster_shape: POSTER_SHAPE.to_string(),
        description,
    }
}
