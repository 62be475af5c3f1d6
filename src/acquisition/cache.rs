//! TTL content cache with deduplication.
//!
//! Entries are keyed by `url#content_hash`, so a page revision creates a new
//! entry while an unchanged page is recognized as a duplicate. Expired
//! entries are dropped lazily on read and in bulk by `delete_expired`.

use crate::types::CacheEntry;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache storage error: {0}")]
    Storage(#[from] sled::Error),
    #[error("cache entry serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("cache lock poisoned")]
    Poisoned,
}

fn entry_key(url: &str, content_hash: &str) -> String {
    format!("{url}#{content_hash}")
}

/// Storage seam for cached content blocks.
pub trait ContentCache: Send + Sync {
    /// All unexpired entries cached for a URL.
    fn get(&self, url: &str) -> Result<Vec<CacheEntry>, CacheError>;

    /// Insert an entry unless an unexpired duplicate (same url + hash)
    /// already exists. Returns whether the entry was actually stored.
    fn put(&self, entry: &CacheEntry) -> Result<bool, CacheError>;

    /// Remove every expired entry, returning how many were dropped.
    fn delete_expired(&self) -> Result<usize, CacheError>;

    /// Total entries currently stored, expired ones included.
    fn entry_count(&self) -> usize;
}

/// Durable cache backed by an embedded sled tree, JSON-encoded values.
pub struct SledContentCache {
    db: sled::Db,
}

impl SledContentCache {
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, CacheError> {
        Ok(Self {
            db: sled::open(path)?,
        })
    }
}

impl ContentCache for SledContentCache {
    fn get(&self, url: &str) -> Result<Vec<CacheEntry>, CacheError> {
        let now = Utc::now();
        let prefix = format!("{url}#");
        let mut entries = Vec::new();
        for item in self.db.scan_prefix(prefix.as_bytes()) {
            let (key, value) = item?;
            let entry: CacheEntry = serde_json::from_slice(&value)?;
            if entry.is_expired(now) {
                // Lazy expiry on the read path.
                self.db.remove(key)?;
            } else {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    fn put(&self, entry: &CacheEntry) -> Result<bool, CacheError> {
        let key = entry_key(&entry.url, &entry.content_hash);
        if let Some(existing) = self.db.get(key.as_bytes())? {
            let existing: CacheEntry = serde_json::from_slice(&existing)?;
            if !existing.is_expired(Utc::now()) {
                debug!(url = %entry.url, hash = %entry.content_hash, "Duplicate content block - cache hit");
                return Ok(false);
            }
        }
        let value = serde_json::to_vec(entry)?;
        self.db.insert(key.as_bytes(), value)?;
        Ok(true)
    }

    fn delete_expired(&self) -> Result<usize, CacheError> {
        let now = Utc::now();
        let mut removed = 0usize;
        for item in self.db.iter() {
            let (key, value) = item?;
            let expired = serde_json::from_slice::<CacheEntry>(&value)
                .map(|e| e.is_expired(now))
                // Undecodable entries count as expired and get swept.
                .unwrap_or(true);
            if expired {
                self.db.remove(key)?;
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(removed, "Swept expired cache entries");
        }
        Ok(removed)
    }

    fn entry_count(&self) -> usize {
        self.db.len()
    }
}

/// In-memory cache for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryContentCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryContentCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentCache for MemoryContentCache {
    fn get(&self, url: &str) -> Result<Vec<CacheEntry>, CacheError> {
        let now = Utc::now();
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        Ok(entries
            .values()
            .filter(|e| e.url == url && !e.is_expired(now))
            .cloned()
            .collect())
    }

    fn put(&self, entry: &CacheEntry) -> Result<bool, CacheError> {
        let key = entry_key(&entry.url, &entry.content_hash);
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        if let Some(existing) = entries.get(&key) {
            if !existing.is_expired(Utc::now()) {
                return Ok(false);
            }
        }
        entries.insert(key, entry.clone());
        Ok(true)
    }

    fn delete_expired(&self) -> Result<usize, CacheError> {
        let now = Utc::now();
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now));
        Ok(before - entries.len())
    }

    fn entry_count(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{content_hash, ContentBlock, ContentCategory};
    use chrono::Duration;

    fn block(url: &str, body: &str) -> ContentBlock {
        ContentBlock {
            source_name: "test".to_string(),
            source_url: url.to_string(),
            title: "Test".to_string(),
            body: body.to_string(),
            category: ContentCategory::Parking,
            relevance: 0.0,
            content_hash: content_hash(body),
            last_updated: Utc::now(),
        }
    }

    fn exercise_cache(cache: &dyn ContentCache) {
        let entry = CacheEntry::new(block("https://x.test/p", "30 minutes | OMR 0.600"), Duration::hours(24));

        assert!(cache.put(&entry).expect("put"));
        // Same url + hash within TTL: duplicate, not re-stored.
        assert!(!cache.put(&entry).expect("put dup"));

        // Same url, changed content: separate entry.
        let revised = CacheEntry::new(block("https://x.test/p", "30 minutes | OMR 0.800"), Duration::hours(24));
        assert!(cache.put(&revised).expect("put revised"));

        let got = cache.get("https://x.test/p").expect("get");
        assert_eq!(got.len(), 2);
        assert!(cache.get("https://x.test/other").expect("get").is_empty());
    }

    #[test]
    fn test_memory_cache_dedup() {
        exercise_cache(&MemoryContentCache::new());
    }

    #[test]
    fn test_sled_cache_dedup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = SledContentCache::open(dir.path()).expect("open");
        exercise_cache(&cache);
    }

    #[test]
    fn test_expired_entries_invisible_and_swept() {
        let cache = MemoryContentCache::new();
        let fresh = CacheEntry::new(block("https://x.test/a", "fresh"), Duration::hours(24));
        let stale = CacheEntry::new(block("https://x.test/b", "stale"), Duration::hours(-1));
        cache.put(&fresh).expect("put");
        cache.put(&stale).expect("put");

        assert!(cache.get("https://x.test/b").expect("get").is_empty());
        assert_eq!(cache.delete_expired().expect("sweep"), 1);
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn test_sled_cache_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entry = CacheEntry::new(block("https://x.test/p", "persistent"), Duration::hours(24));
        {
            let cache = SledContentCache::open(dir.path()).expect("open");
            assert!(cache.put(&entry).expect("put"));
        }
        let cache = SledContentCache::open(dir.path()).expect("reopen");
        assert_eq!(cache.get("https://x.test/p").expect("get").len(), 1);
    }

    #[test]
    fn test_expired_duplicate_can_be_replaced() {
        let cache = MemoryContentCache::new();
        let stale = CacheEntry::new(block("https://x.test/p", "same body"), Duration::hours(-1));
        cache.put(&stale).expect("put");
        // Identical content whose previous entry expired is fresh again.
        let renewed = CacheEntry::new(block("https://x.test/p", "same body"), Duration::hours(24));
        assert!(cache.put(&renewed).expect("put renewed"));
    }
}
