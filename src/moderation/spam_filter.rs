//! Cached banned-word matching, grounded on the source archive's
//! `SpamFilterService`: a 5-minute-TTL cache over the banned-word table,
//! matched with case-insensitive word-boundary regexes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use regex::Regex;
use tokio::sync::RwLock;

use crate::repository::{BannedWordRepository, RepositoryError};

const CACHE_TTL: Duration = Duration::from_secs(300);

struct Cache {
    words: Vec<String>,
    patterns: Vec<Regex>,
    refreshed_at: Instant,
}

pub struct SpamFilter {
    repository: Arc<BannedWordRepository>,
    cache: RwLock<Option<Cache>>,
}

impl SpamFilter {
    pub fn new(repository: Arc<BannedWordRepository>) -> Self {
        Self { repository, cache: RwLock::new(None) }
    }

    /// Forces the next check to refresh from the database, used after an
    /// admin mutates the banned-word list.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    /// Returns `(is_spam, matched_words)`.
    pub async fn check(&self, text: &str) -> Result<(bool, Vec<String>), RepositoryError> {
        self.refresh_if_stale().await?;
        let cache = self.cache.read().await;
        let Some(cache) = cache.as_ref() else {
            return Ok((false, Vec::new()));
        };
        let mut matched = Vec::new();
        for (word, pattern) in cache.words.iter().zip(cache.patterns.iter()) {
            if pattern.is_match(text) {
                matched.push(word.clone());
            }
        }
        Ok((!matched.is_empty(), matched))
    }

    async fn refresh_if_stale(&self) -> Result<(), RepositoryError> {
        let needs_refresh = {
            let cache = self.cache.read().await;
            match cache.as_ref() {
                Some(c) => c.refreshed_at.elapsed() > CACHE_TTL,
                None => true,
            }
        };
        if !needs_refresh {
            return Ok(());
        }
        let banned = self.repository.list().await?;
        let words: Vec<String> = banned.into_iter().map(|b| b.word).collect();
        let patterns = words
            .iter()
            .filter_map(|w| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(w))).ok())
            .collect();
        *self.cache.write().await =
            Some(Cache { words, patterns, refreshed_at: Instant::now() });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_boundary_regex_does_not_match_substrings() {
        let re = Regex::new(r"(?i)\bcat\b").unwrap();
        assert!(re.is_match("the cat sat"));
        assert!(!re.is_match("concatenate"));
    }
}
