//! Per-source fetch pacing.
//!
//! Each source has an async slot recording its last fetch start. Acquiring a
//! permit locks the slot, sleeps out any remaining interval, stamps the new
//! fetch time, and holds the lock until the permit drops. Concurrent fetches
//! to the same source therefore serialize; distinct sources never wait on
//! each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::time::{sleep, Duration, Instant};
use tracing::debug;

type Slot = Arc<AsyncMutex<Option<Instant>>>;

/// Held for the duration of one fetch to a source.
pub struct RatePermit {
    _slot: OwnedMutexGuard<Option<Instant>>,
}

#[derive(Default)]
pub struct SourceRateLimiter {
    slots: Mutex<HashMap<String, Slot>>,
}

impl SourceRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until the source's minimum interval has elapsed, then claim it.
    pub async fn acquire(&self, source: &str, min_interval: Duration) -> RatePermit {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.entry(source.to_string()).or_default().clone()
        };

        let mut guard = slot.lock_owned().await;
        if let Some(last) = *guard {
            let elapsed = last.elapsed();
            if elapsed < min_interval {
                let wait = min_interval - elapsed;
                debug!(source, wait_ms = wait.as_millis() as u64, "Rate limit - pacing fetch");
                sleep(wait).await;
            }
        }
        *guard = Some(Instant::now());
        RatePermit { _slot: guard }
    }
}
