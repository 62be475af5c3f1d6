//! Built-in defaults: the external source set and pipeline constants.
//!
//! Centralises values that would otherwise be scattered across the pipeline.

use crate::config::SourceConfig;
use crate::types::ContentCategory;

// ============================================================================
// Pipeline
// ============================================================================

/// Confidence reported when no pattern fires and no topic can be continued.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Confidence for the low-confidence "please rephrase" fallback response.
pub const REPHRASE_CONFIDENCE: f64 = 0.3;

/// Confidence for the top-level apology response after an unexpected error.
pub const APOLOGY_CONFIDENCE: f64 = 0.1;

/// Topic continuation with a strong cost/duration cue on a transportation
/// topic.
pub const CONTINUATION_STRONG_CONFIDENCE: f64 = 0.75;

/// Topic continuation with only a generic follow-up cue.
pub const CONTINUATION_WEAK_CONFIDENCE: f64 = 0.6;

/// Floor applied to confidence when the answer came from a static template
/// with no live content behind it.
pub const TEMPLATE_CONFIDENCE: f64 = 0.55;

// ============================================================================
// External sources
// ============================================================================

/// Default scrape interval per source (seconds).
pub const DEFAULT_SOURCE_INTERVAL_SECS: u64 = 60;

/// The built-in Muscat International Airport source set.
///
/// Selector entries are section-heading hints passed to the fetcher; blocks
/// whose titles match them rank ahead of unmatched blocks from the same page.
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            name: "muscat-parking".to_string(),
            url: "https://www.muscatairport.co.om/en/content/car-parking".to_string(),
            category: ContentCategory::Parking,
            selectors: vec![
                "parking".to_string(),
                "rates".to_string(),
                "forecourt".to_string(),
            ],
            min_interval_secs: DEFAULT_SOURCE_INTERVAL_SECS,
        },
        SourceConfig {
            name: "muscat-to-from".to_string(),
            url: "https://www.muscatairport.co.om/en/content/to-from".to_string(),
            category: ContentCategory::Transportation,
            selectors: vec![
                "taxi".to_string(),
                "bus".to_string(),
                "car rental".to_string(),
                "directions".to_string(),
            ],
            min_interval_secs: DEFAULT_SOURCE_INTERVAL_SECS,
        },
        SourceConfig {
            name: "muscat-services".to_string(),
            url: "https://www.muscatairport.co.om/en/content/airport-services".to_string(),
            category: ContentCategory::Services,
            selectors: vec![
                "lounge".to_string(),
                "wifi".to_string(),
                "baggage".to_string(),
                "facilities".to_string(),
            ],
            min_interval_secs: DEFAULT_SOURCE_INTERVAL_SECS,
        },
        SourceConfig {
            name: "muscat-flights".to_string(),
            url: "https://www.muscatairport.co.om/en/flights".to_string(),
            category: ContentCategory::Flight,
            selectors: vec!["arrivals".to_string(), "departures".to_string()],
            min_interval_secs: DEFAULT_SOURCE_INTERVAL_SECS,
        },
    ]
}
