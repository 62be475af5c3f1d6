//! Context Store
//!
//! Read-through, capacity-bounded session cache over a persistent history
//! provider. Each session's state is guarded by its own async mutex so turns
//! apply in request order; different sessions proceed in parallel.
//!
//! The cache is a performance layer: when the provider is unavailable the
//! store degrades to an empty context for that turn instead of failing the
//! query.

use crate::types::{ConversationContext, Turn, MAX_CONTEXT_TURNS};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Persistent conversation history, read-only from the core's perspective.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Load the last turns for a session, newest first.
    async fn load_history(&self, session_id: &str) -> anyhow::Result<Vec<Turn>>;
}

/// Provider for deployments without durable history.
pub struct NoHistory;

#[async_trait]
impl HistoryProvider for NoHistory {
    async fn load_history(&self, _session_id: &str) -> anyhow::Result<Vec<Turn>> {
        Ok(Vec::new())
    }
}

type SessionHandle = Arc<Mutex<ConversationContext>>;

/// LRU-ordered session map. Explicit capacity; no hidden process-wide state.
struct SessionCache {
    map: HashMap<String, SessionHandle>,
    /// Access order, least-recent at the front.
    order: VecDeque<String>,
    capacity: usize,
}

impl SessionCache {
    fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn touch(&mut self, session_id: &str) {
        if let Some(pos) = self.order.iter().position(|s| s == session_id) {
            self.order.remove(pos);
        }
        self.order.push_back(session_id.to_string());
    }

    fn insert(&mut self, session_id: String, handle: SessionHandle) {
        self.map.insert(session_id.clone(), handle);
        self.order.push_back(session_id);
        while self.map.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.map.remove(&evicted);
                debug!(session = %evicted, "Evicted stale session context");
            }
        }
    }
}

/// Per-session conversational state with read-through loading.
pub struct ContextStore {
    sessions: Mutex<SessionCache>,
    provider: Arc<dyn HistoryProvider>,
}

impl ContextStore {
    pub fn new(provider: Arc<dyn HistoryProvider>, capacity: usize) -> Self {
        Self {
            sessions: Mutex::new(SessionCache::new(capacity)),
            provider,
        }
    }

    /// Get (or lazily create) the context handle for a session.
    ///
    /// On a cache miss the persistent history is loaded once; a provider
    /// failure is logged and yields an empty context so the query proceeds
    /// statelessly.
    pub async fn get(&self, session_id: &str) -> SessionHandle {
        {
            let mut cache = self.sessions.lock().await;
            if let Some(handle) = cache.map.get(session_id).cloned() {
                cache.touch(session_id);
                return handle;
            }
        }

        // Load outside the cache lock; a concurrent first-message race is
        // resolved below by re-checking before insert.
        let context = match self.provider.load_history(session_id).await {
            Ok(history) => ConversationContext::from_history(session_id, history),
            Err(e) => {
                warn!(session = %session_id, error = %e, "History load failed - starting stateless");
                ConversationContext::new(session_id)
            }
        };

        let mut cache = self.sessions.lock().await;
        if let Some(handle) = cache.map.get(session_id).cloned() {
            cache.touch(session_id);
            return handle;
        }
        let handle = Arc::new(Mutex::new(context));
        cache.insert(session_id.to_string(), handle.clone());
        handle
    }

    /// Read a point-in-time snapshot of a session's context.
    pub async fn snapshot(&self, session_id: &str) -> ConversationContext {
        let handle = self.get(session_id).await;
        let guard = handle.lock().await;
        guard.clone()
    }

    /// Append a user/assistant exchange, serialized per session.
    ///
    /// The turn bound (`MAX_CONTEXT_TURNS`) is enforced inside
    /// `push_exchange`; this method can never grow a session unboundedly.
    pub async fn update(&self, session_id: &str, user: Turn, assistant: Turn) {
        let handle = self.get(session_id).await;
        let mut guard = handle.lock().await;
        guard.push_exchange(user, assistant);
        debug_assert!(guard.turns.len() <= MAX_CONTEXT_TURNS);
    }

    /// Number of sessions currently cached.
    pub async fn cached_sessions(&self) -> usize {
        self.sessions.lock().await.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IntentKind;

    struct CannedHistory(Vec<Turn>);

    #[async_trait]
    impl HistoryProvider for CannedHistory {
        async fn load_history(&self, _session_id: &str) -> anyhow::Result<Vec<Turn>> {
            Ok(self.0.clone())
        }
    }

    struct FailingHistory;

    #[async_trait]
    impl HistoryProvider for FailingHistory {
        async fn load_history(&self, _session_id: &str) -> anyhow::Result<Vec<Turn>> {
            anyhow::bail!("store offline")
        }
    }

    #[tokio::test]
    async fn test_read_through_load_once() {
        let history = vec![
            Turn::user("parking rates?", IntentKind::Parking),
            Turn::assistant("rates are..."),
        ];
        let store = ContextStore::new(Arc::new(CannedHistory(history)), 8);

        let ctx = store.snapshot("s1").await;
        assert_eq!(ctx.turns.len(), 2);
        assert_eq!(ctx.current_topic, Some(IntentKind::Parking));
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_empty() {
        let store = ContextStore::new(Arc::new(FailingHistory), 8);
        let ctx = store.snapshot("s1").await;
        assert!(ctx.turns.is_empty());
        assert!(ctx.current_topic.is_none());
    }

    #[tokio::test]
    async fn test_turn_bound_enforced() {
        let store = ContextStore::new(Arc::new(NoHistory), 8);
        for i in 0..11 {
            store
                .update(
                    "s1",
                    Turn::user(format!("q{i}"), IntentKind::Taxi),
                    Turn::assistant(format!("a{i}")),
                )
                .await;
        }
        let ctx = store.snapshot("s1").await;
        assert_eq!(ctx.turns.len(), MAX_CONTEXT_TURNS);
        assert_eq!(ctx.turns[0].text, "q10");
        // Oldest exchange (q5/a5 and earlier) evicted.
        assert!(ctx.turns.iter().all(|t| t.text != "q5"));
    }

    #[tokio::test]
    async fn test_lru_eviction_respects_capacity() {
        let store = ContextStore::new(Arc::new(NoHistory), 2);
        store.get("a").await;
        store.get("b").await;
        store.get("c").await;
        assert_eq!(store.cached_sessions().await, 2);
    }

    #[tokio::test]
    async fn test_sessions_independent() {
        let store = ContextStore::new(Arc::new(NoHistory), 8);
        store
            .update("a", Turn::user("taxi?", IntentKind::Taxi), Turn::assistant("yes"))
            .await;
        let b = store.snapshot("b").await;
        assert!(b.turns.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_updates_serialized() {
        let store = Arc::new(ContextStore::new(Arc::new(NoHistory), 8));
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update(
                        "s1",
                        Turn::user(format!("q{i}"), IntentKind::Parking),
                        Turn::assistant(format!("a{i}")),
                    )
                    .await;
            }));
        }
        for h in handles {
            h.await.expect("update task panicked");
        }
        let ctx = store.snapshot("s1").await;
        // Bound holds under concurrency; turns stay well-formed pairs.
        assert_eq!(ctx.turns.len(), MAX_CONTEXT_TURNS);
    }
}
