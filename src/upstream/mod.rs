//! Upstream services the resolution pipeline talks to.
//!
//! Two collaborators sit behind async traits so the pipeline can be driven
//! by in-memory fakes in tests:
//!
//! - [`ContentService`]: catalog listing and per-source media listing
//! - [`UnlockService`]: exchanges raw media URLs for premium links
//!
//! HTTP implementations live in [`content_api`] and [`unlock`].

pub mod content_api;
pub mod unlock;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::UpstreamError;
use crate::model::{CatalogEntry, MediaItem, SourceRef};

pub use content_api::ContentApiClient;
pub use unlock::{
    LinkUnlocker, UnlockApiClient, UnlockOutcome, UnlockRequest, UnlockResponse, UnlockService,
};

/// Catalog/media API.
///
/// `Ok(vec![])` means the upstream has nothing; `Err` means the call failed.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// List catalog entries for a display category (`"all"` for everything).
    async fn list_entries(&self, category: &str) -> Result<Vec<CatalogEntry>, UpstreamError>;

    /// List playable media for one source of an entry.
    async fn list_media(&self, source: &SourceRef) -> Result<Vec<MediaItem>, UpstreamError>;
}

/// Soft-failing front for a [`ContentService`].
///
/// Every failure is logged and collapsed to an empty list.
#[derive(Clone)]
pub struct ContentFetcher {
    service: Arc<dyn ContentService>,
}

impl ContentFetcher {
    pub fn new(service: Arc<dyn ContentService>) -> Self {
        Self { service }
    }

    /// Catalog entries for `category`, empty on any upstream failure.
    pub async fn fetch_catalog(&self, category: &str) -> Vec<CatalogEntry> {
        match self.service.list_entries(category).await {
            Ok(entries) => {
                debug!(category, count = entries.len(), "Catalog fetched");
                entries
            }
            Err(e) => {
                warn!(category, error = %e, "Catalog fetch failed, using empty list");
                Vec::new()
            }
        }
    }

    /// Media items for one source, empty on any upstream failure.
    pub async fn fetch_media(&self, source: &SourceRef) -> Vec<MediaItem> {
        match self.service.list_media(source).await {
            Ok(items) => {
                debug!(
                    source = %source.source,
                    id = %source.id,
                    count = items.len(),
                    "Media fetched"
                );
                items
            }
            Err(e) => {
                warn!(
                    source = %source.source,
                    id = %source.id,
                    error = %e,
                    "Media fetch failed, skipping source"
                );
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for ContentFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentFetcher").finish_non_exhaustive()
    }
}
