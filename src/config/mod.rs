//! Engine Configuration
//!
//! All tunable weights, thresholds, TTLs, and source definitions, loaded
//! from TOML with built-in defaults.
//!
//! ## Loading Order
//!
//! 1. `AERODESK_CONFIG` environment variable (path to TOML file)
//! 2. `aerodesk.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The config is passed into the engine explicitly; there is no process-wide
//! global.

pub mod defaults;

use crate::types::ContentCategory;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable naming an explicit config path.
pub const CONFIG_ENV_VAR: &str = "AERODESK_CONFIG";

/// Default config filename looked up in the working directory.
pub const CONFIG_FILENAME: &str = "aerodesk.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Knowledge matcher weights and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Points per keyword appearing as a whole word in the query.
    pub keyword_hit: u32,
    /// Points per content word shared between query and entry question.
    pub shared_word: u32,
    /// Points per concept-to-keyword match.
    pub concept_match: u32,
    /// Bonus when the query's grammatical form matches the entry question.
    pub form_match: u32,
    /// Empirically chosen raw-score normalizer.
    pub score_normalizer: f64,
    /// Minimum raw score for an entry to be kept at all.
    pub raw_floor: u32,
    /// Minimum normalized relevance for a usable match.
    pub relevance_floor: f64,
    /// Relevance above which the match short-circuits content acquisition.
    pub short_circuit: f64,
    /// Candidates returned for the synthesizer fallback blend.
    pub max_candidates: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            keyword_hit: 3,
            shared_word: 8,
            concept_match: 20,
            form_match: 25,
            score_normalizer: 120.0,
            raw_floor: 15,
            relevance_floor: 0.25,
            short_circuit: 0.8,
            max_candidates: 3,
        }
    }
}

/// Context store sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Sessions held in the in-memory cache before LRU eviction.
    pub session_cache_capacity: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            session_cache_capacity: 512,
        }
    }
}

/// Content acquisition tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Per-source fetch timeout.
    pub fetch_timeout_secs: u64,
    /// TTL for cached content blocks.
    pub cache_ttl_hours: i64,
    /// Coarse filter: minimum block body length.
    pub min_block_len: usize,
    /// Coarse filter: maximum block body length.
    pub max_block_len: usize,
    /// Blocks requested by the pipeline per query.
    pub search_limit: usize,
    /// Distinct query words that must overlap a block to keep it.
    pub min_word_overlap: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 30,
            cache_ttl_hours: 24,
            min_block_len: 40,
            max_block_len: 4000,
            search_limit: 5,
            min_word_overlap: 1,
        }
    }
}

/// One configured external source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
    pub category: ContentCategory,
    /// Structural hints for the fetcher (heading/selector names).
    #[serde(default)]
    pub selectors: Vec<String>,
    /// Minimum interval between consecutive fetches to this source.
    pub min_interval_secs: u64,
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub matcher: MatcherConfig,
    pub context: ContextConfig,
    pub acquisition: AcquisitionConfig,
    pub sources: Vec<SourceConfig>,
}

impl EngineConfig {
    /// Load using the documented order, falling back to defaults.
    ///
    /// A missing file is normal; a present-but-malformed file is logged and
    /// skipped rather than aborting startup.
    pub fn load() -> Self {
        let candidate = std::env::var(CONFIG_ENV_VAR)
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| CONFIG_FILENAME.to_string());

        if Path::new(&candidate).exists() {
            match Self::from_file(&candidate) {
                Ok(config) => {
                    info!(path = %candidate, "Loaded engine config");
                    return config.with_default_sources();
                }
                Err(e) => {
                    warn!(path = %candidate, error = %e, "Config load failed - using defaults");
                }
            }
        }
        Self::default().with_default_sources()
    }

    /// Parse and validate a specific TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Fill in the built-in source set when the config names none.
    pub fn with_default_sources(mut self) -> Self {
        if self.sources.is_empty() {
            self.sources = defaults::default_sources();
        }
        self
    }

    /// Reject malformed values before the engine starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matcher.score_normalizer <= 0.0 {
            return Err(ConfigError::Invalid(
                "matcher.score_normalizer must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.matcher.relevance_floor) {
            return Err(ConfigError::Invalid(
                "matcher.relevance_floor must be within [0,1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.matcher.short_circuit) {
            return Err(ConfigError::Invalid(
                "matcher.short_circuit must be within [0,1]".to_string(),
            ));
        }
        if self.matcher.short_circuit < self.matcher.relevance_floor {
            return Err(ConfigError::Invalid(
                "matcher.short_circuit must not be below matcher.relevance_floor".to_string(),
            ));
        }
        if self.acquisition.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "acquisition.fetch_timeout_secs must be positive".to_string(),
            ));
        }
        if self.acquisition.cache_ttl_hours <= 0 {
            return Err(ConfigError::Invalid(
                "acquisition.cache_ttl_hours must be positive".to_string(),
            ));
        }
        if self.acquisition.min_block_len >= self.acquisition.max_block_len {
            return Err(ConfigError::Invalid(
                "acquisition.min_block_len must be below max_block_len".to_string(),
            ));
        }
        if self.context.session_cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "context.session_cache_capacity must be positive".to_string(),
            ));
        }
        for source in &self.sources {
            if source.name.is_empty() || source.url.is_empty() {
                return Err(ConfigError::Invalid(
                    "sources require a name and a url".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = EngineConfig::default().with_default_sources();
        assert!(config.validate().is_ok());
        assert!(!config.sources.is_empty());
        assert_eq!(config.matcher.keyword_hit, 3);
        assert_eq!(config.matcher.form_match, 25);
        assert_eq!(config.acquisition.fetch_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let mut config = EngineConfig::default();
        config.matcher.short_circuit = 0.1; // below relevance_floor
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.acquisition.cache_ttl_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_overlays_defaults() {
        let toml_src = r#"
            [matcher]
            short_circuit = 0.85

            [acquisition]
            search_limit = 8
        "#;
        let config: EngineConfig = toml::from_str(toml_src).expect("valid toml");
        assert!((config.matcher.short_circuit - 0.85).abs() < f64::EPSILON);
        assert_eq!(config.acquisition.search_limit, 8);
        // Untouched sections keep defaults.
        assert_eq!(config.matcher.keyword_hit, 3);
        assert_eq!(config.context.session_cache_capacity, 512);
    }
}
