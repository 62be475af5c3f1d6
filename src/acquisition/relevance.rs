//! Coarse filtering, categorization, and per-query scoring of raw blocks.

use crate::config::AcquisitionConfig;
use crate::types::{ContentBlock, ContentCategory};

/// Boilerplate markers that disqualify a block outright.
const REJECT_TERMS: &[&str] = &[
    "cookie policy",
    "privacy policy",
    "terms and conditions",
    "all rights reserved",
    "subscribe to our newsletter",
    "enable javascript",
];

/// Keyword cues per category, counted over title + body.
const CATEGORY_TERMS: &[(ContentCategory, &[&str])] = &[
    (
        ContentCategory::Parking,
        &["parking", "car park", "park your", "short-term", "long-term", "tariff"],
    ),
    (
        ContentCategory::Transportation,
        &["taxi", "bus", "shuttle", "car rental", "rent a car", "transfer", "pick-up"],
    ),
    (
        ContentCategory::Flight,
        &["flight", "arrival", "departure", "check-in", "boarding", "gate"],
    ),
    (
        ContentCategory::Services,
        &["lounge", "wifi", "wi-fi", "baggage", "luggage", "prayer", "restaurant", "shop"],
    ),
];

/// Length bounds plus boilerplate rejection. Cheap, runs before hashing.
pub fn coarse_filter(body: &str, cfg: &AcquisitionConfig) -> bool {
    let len = body.len();
    if len < cfg.min_block_len || len > cfg.max_block_len {
        return false;
    }
    let lower = body.to_lowercase();
    !REJECT_TERMS.iter().any(|t| lower.contains(t))
}

/// Best-hit category over the cue table, `General` when nothing matches.
pub fn detect_category(title: &str, body: &str) -> ContentCategory {
    let text = format!("{} {}", title.to_lowercase(), body.to_lowercase());
    let mut best = (ContentCategory::General, 0usize);
    for (category, terms) in CATEGORY_TERMS {
        let hits = terms.iter().filter(|t| text.contains(*t)).count();
        if hits > best.1 {
            best = (*category, hits);
        }
    }
    best.0
}

fn query_words(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(str::to_string)
        .collect()
}

/// Score a block against a query by word overlap, title hits counting double.
///
/// Returns `None` below the configured overlap minimum so irrelevant blocks
/// never reach the synthesizer.
pub fn score_block(query: &str, block: &ContentBlock, cfg: &AcquisitionConfig) -> Option<f64> {
    let words = query_words(query);
    if words.is_empty() {
        return None;
    }
    let title = block.title.to_lowercase();
    let body = block.body.to_lowercase();

    let mut overlap = 0usize;
    let mut weighted = 0.0f64;
    for word in &words {
        let in_title = title.contains(word.as_str());
        let in_body = body.contains(word.as_str());
        if in_title || in_body {
            overlap += 1;
            weighted += if in_title { 2.0 } else { 1.0 };
        }
    }
    if overlap < cfg.min_word_overlap {
        return None;
    }
    Some((weighted / (words.len() as f64 * 2.0)).clamp(0.0, 1.0))
}
