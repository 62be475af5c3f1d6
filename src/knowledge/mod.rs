//! Knowledge Base
//!
//! Curated Q&A entries with a scored matcher. The active entry set is held
//! in an `ArcSwap` snapshot: readers are lock-free on the query path while
//! `refresh()` swaps in a new set from the provider (eventually consistent,
//! read-only from the core's perspective).

mod matcher;
mod seed;

pub use matcher::KnowledgeMatcher;
pub use seed::seed_entries;

use crate::types::KnowledgeEntry;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Administrative collaborator owning the curated entries.
#[async_trait]
pub trait KnowledgeProvider: Send + Sync {
    async fn load_active_entries(&self) -> anyhow::Result<Vec<KnowledgeEntry>>;
}

/// Lock-free snapshot of the active knowledge entries.
pub struct KnowledgeBase {
    entries: ArcSwap<Vec<KnowledgeEntry>>,
    provider: Option<Arc<dyn KnowledgeProvider>>,
}

impl KnowledgeBase {
    /// Base seeded with the built-in curated set (answers out of the box).
    pub fn seeded() -> Self {
        Self {
            entries: ArcSwap::from_pointee(seed_entries()),
            provider: None,
        }
    }

    /// Base fed by an external provider; starts from the seed set until the
    /// first `refresh()`.
    pub fn with_provider(provider: Arc<dyn KnowledgeProvider>) -> Self {
        Self {
            entries: ArcSwap::from_pointee(seed_entries()),
            provider: Some(provider),
        }
    }

    /// Swap in the provider's current active entries.
    ///
    /// A provider failure keeps the previous snapshot (logged, not fatal).
    pub async fn refresh(&self) -> usize {
        let Some(provider) = &self.provider else {
            return self.entries.load().len();
        };
        match provider.load_active_entries().await {
            Ok(entries) => {
                let count = entries.len();
                self.entries.store(Arc::new(entries));
                info!(count, "Knowledge base refreshed");
                count
            }
            Err(e) => {
                warn!(error = %e, "Knowledge refresh failed - keeping previous snapshot");
                self.entries.load().len()
            }
        }
    }

    /// Current snapshot for one query's lifetime.
    pub fn snapshot(&self) -> Arc<Vec<KnowledgeEntry>> {
        self.entries.load_full()
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TwoEntries;

    #[async_trait]
    impl KnowledgeProvider for TwoEntries {
        async fn load_active_entries(&self) -> anyhow::Result<Vec<KnowledgeEntry>> {
            Ok(seed_entries().into_iter().take(2).collect())
        }
    }

    struct BrokenProvider;

    #[async_trait]
    impl KnowledgeProvider for BrokenProvider {
        async fn load_active_entries(&self) -> anyhow::Result<Vec<KnowledgeEntry>> {
            anyhow::bail!("admin store offline")
        }
    }

    #[test]
    fn test_seeded_base_not_empty() {
        assert!(!KnowledgeBase::seeded().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_swaps_snapshot() {
        let kb = KnowledgeBase::with_provider(Arc::new(TwoEntries));
        let before = kb.len();
        let after = kb.refresh().await;
        assert_eq!(after, 2);
        assert_ne!(before, after);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous() {
        let kb = KnowledgeBase::with_provider(Arc::new(BrokenProvider));
        let before = kb.len();
        let after = kb.refresh().await;
        assert_eq!(before, after);
    }
}
