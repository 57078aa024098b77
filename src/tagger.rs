//! Deterministic, frequency-based tag extraction. Unlike the summariser, this
//! never calls an external LLM: the component design requires tagging to be
//! reproducible given identical input and banned-word set.

use std::collections::HashMap;

pub const DEFAULT_MAX_TAGS: usize = 50;
pub const MIN_TAG_LENGTH: usize = 2;
pub const MAX_TAG_LENGTH: usize = 50;
pub const MAX_TAGS_PER_DOCUMENT: usize = 1000;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "of", "to", "in", "on", "for", "with", "by", "at",
    "is", "are", "was", "were", "be", "been", "being", "this", "that", "these", "those", "it",
    "as", "from", "into", "there", "their", "its", "his", "her", "he", "she", "they", "we",
    "you", "i", "not", "no", "do", "does", "did", "has", "have", "had", "will", "would",
    "can", "could", "should", "shall", "may", "might", "must", "than", "then", "so", "if",
];

/// Extracts the top `max_tags` most frequent words/short phrases from `text`,
/// lowercased, with stop words and `banned` terms filtered out.
pub fn extract_tags(text: &str, banned: &[String], max_tags: usize) -> Vec<String> {
    let banned_set: std::collections::HashSet<String> =
        banned.iter().map(|w| w.to_lowercase()).collect();
    let stop_set: std::collections::HashSet<&str> = STOP_WORDS.iter().copied().collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for raw_word in text.split(|c: char| !c.is_alphanumeric() && c != '-') {
        let word = raw_word.trim_matches('-').to_lowercase();
        if word.len() < MIN_TAG_LENGTH || word.len() > MAX_TAG_LENGTH {
            continue;
        }
        if stop_set.contains(word.as_str()) || banned_set.contains(&word) {
            continue;
        }
        if word.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // Sort by descending count, then alphabetically for a stable, deterministic order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(max_tags.min(MAX_TAGS_PER_DOCUMENT))
        .map(|(word, _)| word)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_frequent_words_excluding_stop_words() {
        let text = "budget budget budget report report the a an of report";
        let tags = extract_tags(text, &[], 10);
        assert_eq!(tags[0], "report");
        assert_eq!(tags[1], "budget");
        assert!(!tags.contains(&"the".to_string()));
    }

    #[test]
    fn respects_banned_words() {
        let text = "minister minister document document";
        let tags = extract_tags(text, &["minister".to_string()], 10);
        assert!(!tags.contains(&"minister".to_string()));
        assert!(tags.contains(&"document".to_string()));
    }

    #[test]
    fn is_deterministic_for_identical_input() {
        let text = "alpha beta gamma alpha beta alpha";
        let a = extract_tags(text, &[], 10);
        let b = extract_tags(text, &[], 10);
        assert_eq!(a, b);
    }

    #[test]
    fn caps_at_requested_max() {
        let text = (0..20).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        let tags = extract_tags(&text, &[], 5);
        assert_eq!(tags.len(), 5);
    }
}
