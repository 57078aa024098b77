//! Anonymous rate limiting. Grounded on the source archive's
//! `RateLimitMiddleware.get_client_identifier`: the identifier bucket is a
//! function of wall-clock time only, never of the caller's IP address, so
//! the limit smooths traffic globally rather than tracking any one visitor.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::RwLock;

/// Upload/download bucket width. A caller is identified by which 120-second
/// window their request falls into, not by who they are.
pub const UPLOAD_BUCKET_SECONDS: u64 = 120;
pub const DOWNLOAD_BUCKET_SECONDS: u64 = 120;
/// Per-(document, session) write spacing for comments/annotations.
pub const WRITE_SPACING_SECONDS: i64 = 60;

pub fn bucket_identifier(prefix: &str, bucket_seconds: u64) -> String {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    let bucket_id = now / bucket_seconds.max(1);
    format!("{prefix}_bucket_{bucket_id}")
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitExceeded {
    pub retry_after_seconds: u64,
}

/// Process-local limiter: one action permitted per bucket identifier. A
/// multi-node deployment would back this with a shared store the way the
/// source's Redis-backed `RedisRateLimitStore` does; in-memory is sufficient
/// for the single-node deployments this crate targets.
pub struct InMemoryRateLimiter {
    seen: RwLock<HashMap<String, ()>>,
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self { seen: RwLock::new(HashMap::new()) }
    }

    /// Admits the action if `identifier`'s bucket hasn't already been used;
    /// the bucket naturally expires once its time window passes since a new
    /// identifier string gets minted for the next window.
    pub async fn check_and_record(&self, identifier: &str, bucket_seconds: u64) -> Result<(), RateLimitExceeded> {
        let mut seen = self.seen.write().await;
        if seen.contains_key(identifier) {
            let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
            let bucket_id: u64 = identifier.rsplit('_').next().and_then(|s| s.parse().ok()).unwrap_or(0);
            let bucket_end = (bucket_id + 1) * bucket_seconds.max(1);
            let retry_after_seconds = bucket_end.saturating_sub(now);
            return Err(RateLimitExceeded { retry_after_seconds });
        }
        seen.insert(identifier.to_string(), ());
        // Keep the table from growing unboundedly across long-running processes.
        if seen.len() > 10_000 {
            seen.clear();
        }
        Ok(())
    }
}

/// Seconds remaining before a per-(document, session) write is allowed
/// again, given the timestamp of the last write.
pub fn write_cooldown_remaining(last_write_at: Option<chrono::DateTime<chrono::Utc>>) -> Option<i64> {
    let last = last_write_at?;
    let elapsed = chrono::Utc::now().signed_duration_since(last).num_seconds();
    let remaining = WRITE_SPACING_SECONDS - elapsed;
    (remaining > 0).then_some(remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_identifier_is_not_ip_derived() {
        let id = bucket_identifier("upload", UPLOAD_BUCKET_SECONDS);
        assert!(id.starts_with("upload_bucket_"));
    }

    #[tokio::test]
    async fn second_action_in_same_bucket_is_rejected() {
        let limiter = InMemoryRateLimiter::new();
        let id = "upload_bucket_1";
        limiter.check_and_record(id, UPLOAD_BUCKET_SECONDS).await.unwrap();
        let result = limiter.check_and_record(id, UPLOAD_BUCKET_SECONDS).await;
        assert!(result.is_err());
    }

    #[test]
    fn write_cooldown_is_none_when_spacing_elapsed() {
        let last = chrono::Utc::now() - chrono::Duration::seconds(120);
        assert_eq!(write_cooldown_remaining(Some(last)), None);
    }

    #[test]
    fn write_cooldown_reports_remaining_seconds() {
        let last = chrono::Utc::now() - chrono::Duration::seconds(10);
        let remaining = write_cooldown_remaining(Some(last)).unwrap();
        assert!(remaining > 0 && remaining <= WRITE_SPACING_SECONDS);
    }
}
