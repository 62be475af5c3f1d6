//! Externally retrieved content blocks and their cache envelope.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Content category tag used for source routing and search scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    Parking,
    Transportation,
    Flight,
    Services,
    General,
}

impl ContentCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parking => "parking",
            Self::Transportation => "transportation",
            Self::Flight => "flight",
            Self::Services => "services",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One retrieved/extracted unit of external text with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    pub source_name: String,
    pub source_url: String,
    pub title: String,
    pub body: String,
    pub category: ContentCategory,
    /// Relevance in [0,1]; recomputed per query during search.
    pub relevance: f64,
    /// md5 of the normalized body (dedup key together with the URL).
    pub content_hash: String,
    pub last_updated: DateTime<Utc>,
}

/// Cache envelope for a content block.
///
/// Dedup contract: a `ContentBlock` is never re-emitted as new while an
/// unexpired entry with the same url + content hash exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub url: String,
    pub content_hash: String,
    pub block: ContentBlock,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Wrap a freshly extracted block with a TTL.
    pub fn new(block: ContentBlock, ttl: Duration) -> Self {
        Self {
            url: block.source_url.clone(),
            content_hash: block.content_hash.clone(),
            expires_at: Utc::now() + ttl,
            block,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Collapse whitespace and lowercase so cosmetic markup changes do not
/// defeat deduplication.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// md5 hex digest of the normalized text.
pub fn content_hash(text: &str) -> String {
    format!("{:x}", md5::compute(normalize_text(text)))
}
