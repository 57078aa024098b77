use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannedWord {
    pub id: i32,
    pub word: String,
    pub reason: Option<String>,
    pub banned_by: String,
    pub banned_at: DateTime<Utc>,
}

impl BannedWord {
    /// Banned words are compared case-insensitively and stored lowercase.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase()
    }
}
