//! Suppresses duplicate view-count increments from the same anonymous
//! session within a rolling window.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

const SUPPRESSION_WINDOW: Duration = Duration::from_secs(3600);

pub struct ViewTracker {
    last_seen: RwLock<HashMap<(i32, String), Instant>>,
}

impl Default for ViewTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTracker {
    pub fn new() -> Self {
        Self { last_seen: RwLock::new(HashMap::new()) }
    }

    /// Returns `true` if this `(document_id, session_hash)` should count as a
    /// fresh view (and records it), `false` if it's within the suppression
    /// window of a previous view.
    pub async fn record_if_fresh(&self, document_id: i32, session_hash: &str) -> bool {
        let key = (document_id, session_hash.to_string());
        let mut seen = self.last_seen.write().await;
        if let Some(last) = seen.get(&key) {
            if last.elapsed() < SUPPRESSION_WINDOW {
                return false;
            }
        }
        seen.insert(key, Instant::now());
        true
    }

    /// Drops suppression entries older than the window; intended to run on a
    /// periodic tick alongside the worker poll loop.
    pub async fn purge_expired(&self) {
        let mut seen = self.last_seen.write().await;
        seen.retain(|_, last| last.elapsed() < SUPPRESSION_WINDOW);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_view_in_window_is_suppressed() {
        let tracker = ViewTracker::new();
        assert!(tracker.record_if_fresh(1, "session-a").await);
        assert!(!tracker.record_if_fresh(1, "session-a").await);
    }

    #[tokio::test]
    async fn different_sessions_each_count() {
        let tracker = ViewTracker::new();
        assert!(tracker.record_if_fresh(1, "session-a").await);
        assert!(tracker.record_if_fresh(1, "session-b").await);
    }
}
