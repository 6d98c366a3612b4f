//! `pmstream` - Live-event catalog and stream resolver
//!
//! # Features
//!
//! - **Catalog**: Lists live events from a content API as display items
//! - **Streams**: Resolves an event to playable links from every attached source
//! - **Premium links**: Optional unlocking through a link-unlocking service
//! - **Ranking**: Premium links first, original order otherwise preserved
//!
//! # Example
//!
//! ```rust,no_run
//! use pmstream::{CatalogExtra, Config, ResolutionPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pipeline = ResolutionPipeline::from_config(&Config::load()?)?;
//!     let catalog = pipeline
//!         .catalog("tv", "pm-content-live", &CatalogExtra::category("soccer"))
//!         .await;
//!     println!("{} events", catalog.metas.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http_client;
pub mod model;
pub mod pipeline;
pub mod quality;
pub mod rank;
pub mod upstream;

pub use config::Config;
pub use error::UpstreamError;
pub use model::{
    CatalogEntry, CatalogResponse, CompositeId, MediaItem, MetaPreview, SourceRef, StreamOption,
    StreamResponse, UnlockedLink,
};
pub use pipeline::{CatalogExtra, ResolutionPipeline};
pub use quality::{classify, QualityTier};
pub use rank::rank;
pub use upstream::{ContentService, LinkUnlocker, UnlockOutcome, UnlockService};

/// Version of pmstream
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
