//! Content Acquisition
//!
//! Rate-limited fetching of configured external sources, HTML-to-text block
//! extraction, coarse filtering, TTL caching with hash deduplication, and
//! per-query relevance scoring.
//!
//! Acquisition never fails a query: a source error is logged and contributes
//! zero blocks while the remaining sources proceed.

mod cache;
mod fetcher;
mod rate_limit;
mod relevance;

pub use cache::{CacheError, ContentCache, MemoryContentCache, SledContentCache};
pub use fetcher::{FetchError, HttpFetcher, PageFetcher, RawBlock};
pub use rate_limit::SourceRateLimiter;
pub use relevance::{coarse_filter, detect_category, score_block};

use crate::config::{AcquisitionConfig, SourceConfig};
use crate::types::{content_hash, CacheEntry, ContentBlock, ContentCategory};
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Orchestrates fetching, filtering, caching, and scoring for all sources.
pub struct ContentAcquisition {
    fetcher: Arc<dyn PageFetcher>,
    cache: Arc<dyn ContentCache>,
    limiter: SourceRateLimiter,
    sources: Vec<SourceConfig>,
    cfg: AcquisitionConfig,
}

impl ContentAcquisition {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        cache: Arc<dyn ContentCache>,
        sources: Vec<SourceConfig>,
        cfg: AcquisitionConfig,
    ) -> Self {
        Self {
            fetcher,
            cache,
            limiter: SourceRateLimiter::new(),
            sources,
            cfg,
        }
    }

    /// Fetch one source and return its blocks that were new to the cache.
    ///
    /// Paced by the source's minimum interval; the permit is held across the
    /// fetch so concurrent callers serialize per source. Any error degrades
    /// to an empty result.
    pub async fn fetch_source(&self, source: &SourceConfig) -> Vec<ContentBlock> {
        let _permit = self
            .limiter
            .acquire(&source.name, Duration::from_secs(source.min_interval_secs))
            .await;

        let raw = match self.fetcher.fetch_blocks(&source.url, &source.selectors).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(source = %source.name, error = %e, "Source fetch failed - skipping");
                return Vec::new();
            }
        };

        let ttl = ChronoDuration::hours(self.cfg.cache_ttl_hours);
        let mut fresh = Vec::new();
        for block in raw {
            if !coarse_filter(&block.body, &self.cfg) {
                continue;
            }
            let category = if source.category == ContentCategory::General {
                detect_category(&block.title, &block.body)
            } else {
                source.category
            };
            let block = ContentBlock {
                source_name: source.name.clone(),
                source_url: source.url.clone(),
                title: block.title,
                body: block.body.clone(),
                category,
                relevance: 0.0,
                content_hash: content_hash(&block.body),
                last_updated: Utc::now(),
            };
            match self.cache.put(&CacheEntry::new(block.clone(), ttl)) {
                Ok(true) => fresh.push(block),
                Ok(false) => {} // unexpired duplicate
                Err(e) => {
                    // Fail open: an unusable cache must not drop content.
                    warn!(source = %source.name, error = %e, "Cache write failed");
                    fresh.push(block);
                }
            }
        }
        debug!(source = %source.name, fresh = fresh.len(), "Source fetched");
        fresh
    }

    /// Gather up to `search_limit` blocks relevant to a query.
    ///
    /// Cache-first per source; a source with no cached blocks is fetched
    /// live. Sources matching the query's category are consulted first, and
    /// the scan stops once the limit is met.
    pub async fn search(&self, query: &str, category: ContentCategory) -> Vec<ContentBlock> {
        let mut ordered: Vec<&SourceConfig> = self.sources.iter().collect();
        ordered.sort_by_key(|s| s.category != category);

        let mut results: Vec<ContentBlock> = Vec::new();
        for source in ordered {
            if results.len() >= self.cfg.search_limit {
                break;
            }

            let cached = match self.cache.get(&source.url) {
                Ok(entries) => entries.into_iter().map(|e| e.block).collect::<Vec<_>>(),
                Err(e) => {
                    warn!(source = %source.name, error = %e, "Cache read failed");
                    Vec::new()
                }
            };
            let blocks = if cached.is_empty() {
                self.fetch_source(source).await
            } else {
                cached
            };

            for mut block in blocks {
                if let Some(relevance) = score_block(query, &block, &self.cfg) {
                    block.relevance = relevance;
                    results.push(block);
                }
            }
        }

        results.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(self.cfg.search_limit);
        debug!(query, results = results.len(), "Content search complete");
        results
    }

    /// Drop expired cache entries; called on engine startup.
    pub fn sweep_expired(&self) -> usize {
        match self.cache.delete_expired() {
            Ok(removed) => removed,
            Err(e) => {
                warn!(error = %e, "Cache sweep failed");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedFetcher {
        pages: HashMap<String, Vec<RawBlock>>,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn new(pages: Vec<(&str, Vec<RawBlock>)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(url, blocks)| (url.to_string(), blocks))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch_blocks(
            &self,
            url: &str,
            _selectors: &[String],
        ) -> Result<Vec<RawBlock>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 503,
            })
        }
    }

    fn raw(title: &str, body: &str) -> RawBlock {
        RawBlock {
            title: title.to_string(),
            body: body.to_string(),
        }
    }

    fn source(name: &str, url: &str, category: ContentCategory) -> SourceConfig {
        SourceConfig {
            name: name.to_string(),
            url: url.to_string(),
            category,
            selectors: Vec::new(),
            min_interval_secs: 0,
        }
    }

    const PARKING_BODY: &str =
        "Short-term parking at the terminal: 30 minutes | OMR 0.600, 1 hour | OMR 1.200.";
    const TAXI_BODY: &str =
        "Metered airport taxis wait outside arrivals; a trip downtown is around OMR 10.";

    fn acquisition(
        pages: Vec<(&str, Vec<RawBlock>)>,
        sources: Vec<SourceConfig>,
    ) -> ContentAcquisition {
        ContentAcquisition::new(
            Arc::new(ScriptedFetcher::new(pages)),
            Arc::new(MemoryContentCache::new()),
            sources,
            AcquisitionConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_fetch_dedups_within_ttl() {
        let src = source("parking", "https://x.test/parking", ContentCategory::Parking);
        let acq = acquisition(
            vec![("https://x.test/parking", vec![raw("Parking Rates", PARKING_BODY)])],
            vec![src.clone()],
        );

        let first = acq.fetch_source(&src).await;
        assert_eq!(first.len(), 1);
        // Unchanged content within the TTL is not re-emitted.
        let second = acq.fetch_source(&src).await;
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_empty() {
        let src = source("broken", "https://x.test/missing", ContentCategory::Services);
        let acq = acquisition(Vec::new(), vec![src.clone()]);
        assert!(acq.fetch_source(&src).await.is_empty());
    }

    #[tokio::test]
    async fn test_search_isolates_failing_source() {
        let parking = source("parking", "https://x.test/parking", ContentCategory::Parking);
        let broken = source("broken", "https://x.test/missing", ContentCategory::Parking);
        let acq = acquisition(
            vec![("https://x.test/parking", vec![raw("Parking Rates", PARKING_BODY)])],
            vec![broken, parking],
        );

        let results = acq.search("parking rates", ContentCategory::Parking).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source_name, "parking");
    }

    #[tokio::test]
    async fn test_search_prefers_matching_category() {
        let taxi = source("taxi", "https://x.test/taxi", ContentCategory::Transportation);
        let parking = source("parking", "https://x.test/parking", ContentCategory::Parking);
        let acq = acquisition(
            vec![
                ("https://x.test/taxi", vec![raw("Taxi Services", TAXI_BODY)]),
                ("https://x.test/parking", vec![raw("Parking Rates", PARKING_BODY)]),
            ],
            vec![taxi, parking],
        );

        let results = acq.search("parking rates", ContentCategory::Parking).await;
        assert!(!results.is_empty());
        assert!(results.iter().all(|b| b.category == ContentCategory::Parking));
    }

    #[tokio::test]
    async fn test_search_serves_cache_without_refetch() {
        let src = source("parking", "https://x.test/parking", ContentCategory::Parking);
        let fetcher = Arc::new(ScriptedFetcher::new(vec![(
            "https://x.test/parking",
            vec![raw("Parking Rates", PARKING_BODY)],
        )]));
        let acq = ContentAcquisition::new(
            fetcher.clone(),
            Arc::new(MemoryContentCache::new()),
            vec![src],
            AcquisitionConfig::default(),
        );

        acq.search("parking rates", ContentCategory::Parking).await;
        acq.search("parking rates", ContentCategory::Parking).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_search_scores_and_ranks() {
        let src = source("info", "https://x.test/info", ContentCategory::General);
        let acq = acquisition(
            vec![(
                "https://x.test/info",
                vec![
                    raw("Taxi Services", TAXI_BODY),
                    raw("Parking Rates", PARKING_BODY),
                ],
            )],
            vec![src],
        );

        let results = acq.search("parking rates", ContentCategory::Parking).await;
        assert!(!results.is_empty());
        assert_eq!(results[0].title, "Parking Rates");
        assert!(results[0].relevance > 0.0);
    }
}
