//! Quality tier classification from filenames.
//!
//! Tiers are derived from well-known resolution keywords. The keyword table
//! is evaluated in declaration order and the first keyword found anywhere in
//! the (lowercased) filename wins, so `"show.1080p.from.1440p.mkv"` is `2K`.

use std::fmt;

use serde::Serialize;

/// Closed set of quality tiers a stream can be labeled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QualityTier {
    #[serde(rename = "4K")]
    Uhd4k,
    #[serde(rename = "2K")]
    Qhd2k,
    #[serde(rename = "FHD")]
    FullHd,
    #[serde(rename = "HD")]
    Hd,
    #[serde(rename = "SD")]
    Sd,
}

impl QualityTier {
    /// Short display label (`"4K"`, `"FHD"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uhd4k => "4K",
            Self::Qhd2k => "2K",
            Self::FullHd => "FHD",
            Self::Hd => "HD",
            Self::Sd => "SD",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier used when no keyword matches.
pub const DEFAULT_TIER: QualityTier = QualityTier::Hd;

/// Keyword table, checked top to bottom. Order is significant.
const QUALITY_KEYWORDS: &[(&str, QualityTier)] = &[
    ("uhd", QualityTier::Uhd4k),
    ("4k", QualityTier::Uhd4k),
    ("2160p", QualityTier::Uhd4k),
    ("1440p", QualityTier::Qhd2k),
    ("1080p", QualityTier::FullHd),
    ("720p", QualityTier::Hd),
    ("480p", QualityTier::Sd),
];

/// Classify a filename into a [`QualityTier`].
///
/// Matching is a case-insensitive substring search. Falls back to
/// [`DEFAULT_TIER`] when nothing matches (including the empty string).
pub fn classify(filename: &str) -> QualityTier {
    let lower = filename.to_lowercase();
    QUALITY_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map_or(DEFAULT_TIER, |&(_, tier)| tier)
}
