//! Data model shared by the upstream clients and the resolution pipeline.
//!
//! Upstream payloads are deserialized leniently: unknown fields are ignored
//! and every optional field defaults, so a sparse entry still maps to a
//! display item.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::quality::QualityTier;

/// Name label carried by premium (unlocked) stream options.
pub const PREMIUM_LABEL: &str = "Premium Access";
/// Name label carried by direct stream options.
pub const DIRECT_LABEL: &str = "Direct Access";

/// Catalog entry identifier; upstream sends either a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Text(String),
    Number(serde_json::Number),
}

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

impl EntryId {
    /// Lookup key for this id, or `None` for a blank text id.
    ///
    /// Integral floats render without a fraction, so `42.0` keys as `"42"`.
    pub fn key(&self) -> Option<String> {
        match self {
            Self::Text(s) if s.trim().is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for EntryId {
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) if n.is_f64() => match n.as_f64() {
                Some(v) if v.fract() == 0.0 && v.abs() <= MAX_EXACT_F64 => {
                    write!(f, "{}", v as i64)
                }
                _ => write!(f, "{n}"),
            },
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One listable live event from the content API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub id: Option<EntryId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub teams: Option<TeamPair>,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

/// Home/away participants of a match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamPair {
    #[serde(default)]
    pub home: Option<Team>,
    #[serde(default)]
    pub away: Option<Team>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub badge: Option<String>,
}

impl TeamPair {
    /// `"Home vs Away"`, with `TBD` for a side without a name.
    /// Returns `None` if neither side is named.
    pub fn label(&self) -> Option<String> {
        let name = |team: &Option<Team>| {
            team.as_ref()
                .and_then(|t| t.name.as_deref())
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
        };
        let (home, away) = (name(&self.home), name(&self.away));
        if home.is_none() && away.is_none() {
            return None;
        }
        Some(format!(
            "{} vs {}",
            home.as_deref().unwrap_or("TBD"),
            away.as_deref().unwrap_or("TBD")
        ))
    }
}

/// Where to fetch playable media for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub source: String,
    pub id: String,
}

/// A playable media item returned by one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub url: Option<String>,
    pub quality: Option<String>,
    pub source: String,
}

/// A premium link produced by a successful unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockedLink {
    pub url: String,
    pub filename: String,
    pub quality: QualityTier,
    pub host: String,
    pub size_bytes: u64,
}

/// Externally visible stream choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamOption {
    pub url: String,
    pub title: String,
    pub name: String,
    pub description: String,
}

impl StreamOption {
    /// Build an option for a raw media URL that was not unlocked.
    pub fn direct(url: &str, item: &MediaItem) -> Self {
        let quality = item
            .quality
            .as_deref()
            .filter(|q| !q.is_empty())
            .unwrap_or(QualityTier::Hd.as_str());
        Self {
            url: url.to_string(),
            title: format!("{quality} - {}", item.source),
            name: DIRECT_LABEL.to_string(),
            description: format!("Direct stream from {}", item.source),
        }
    }

    /// Build an option for an unlocked premium link.
    pub fn premium(link: &UnlockedLink) -> Self {
        Self {
            url: link.url.clone(),
            title: format!("{} - {}", link.quality, link.host),
            name: PREMIUM_LABEL.to_string(),
            description: format!(
                "Premium {} link via {} ({})",
                link.quality,
                link.host,
                format_size(link.size_bytes)
            ),
        }
    }

    /// Whether this option carries the premium label.
    pub fn is_premium(&self) -> bool {
        self.name == PREMIUM_LABEL
    }
}

/// Three-part `prefix:category:rawId` identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeId {
    pub prefix: String,
    pub category: String,
    pub raw_id: String,
}

impl CompositeId {
    pub fn new(prefix: &str, category: &str, raw_id: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            category: category.to_string(),
            raw_id: raw_id.to_string(),
        }
    }

    /// Parse a composite id. Anything after the second colon belongs to the
    /// raw id, so raw ids may themselves contain colons.
    pub fn parse(id: &str) -> Option<Self> {
        let mut parts = id.splitn(3, ':');
        let prefix = parts.next()?;
        let category = parts.next()?;
        let raw_id = parts.next()?;
        Some(Self::new(prefix, category, raw_id))
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.prefix, self.category, self.raw_id)
    }
}

/// Catalog display item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaPreview {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub poster_shape: String,
    pub description: String,
}

/// Envelope returned by the catalog operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogResponse {
    pub metas: Vec<MetaPreview>,
}

/// Envelope returned by the stream operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamResponse {
    pub streams: Vec<StreamOption>,
}

/// Human-readable byte size, 1024-based.
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
