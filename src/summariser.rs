//! One-paragraph document summaries via an external LLM, following the
//! teacher's Ollama-compatible `LlmClient` (reqwest + typed request/response).

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const MAX_CONTENT_CHARS: usize = 5_000;
pub const MAX_SUMMARY_WORDS: usize = 200;

const DEFAULT_SUMMARY_PROMPT: &str = "Write one objective paragraph (at most 200 words) \
summarising the following document. Do not speculate beyond the text.\n\nTitle: {title}\n\nContent:\n{content}";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("llm disabled")]
    Disabled,
}

pub type Result<T> = std::result::Result<T, LlmError>;

#[derive(Debug, Clone)]
pub struct SummariserConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub prompt_template: String,
}

impl Default for SummariserConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://localhost:11434".into(),
            model: "dolphin-llama3:8b".into(),
            max_tokens: 512,
            temperature: 0.3,
            prompt_template: DEFAULT_SUMMARY_PROMPT.into(),
        }
    }
}

pub struct Summariser {
    config: SummariserConfig,
    client: reqwest::Client,
}

impl Summariser {
    pub fn new(config: SummariserConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    pub async fn is_available(&self) -> bool {
        if !self.config.enabled {
            return false;
        }
        self.client
            .get(format!("{}/api/tags", self.config.endpoint))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Summarises `content` (truncated to [`MAX_CONTENT_CHARS`]) into one
    /// paragraph. Returns `Ok(None)` rather than erroring on any failure, per
    /// the component design's "summariser failures are non-fatal" policy.
    pub async fn summarise(&self, title: &str, content: &str) -> Result<Option<String>> {
        if !self.config.enabled {
            return Ok(None);
        }
        let truncated: String = content.chars().take(MAX_CONTENT_CHARS).collect();
        let prompt = self
            .config
            .prompt_template
            .replace("{title}", title)
            .replace("{content}", &truncated);

        let response = match self
            .client
            .post(format!("{}/api/generate", self.config.endpoint))
            .json(&OllamaRequest {
                model: &self.config.model,
                prompt: &prompt,
                stream: false,
                options: OllamaOptions {
                    temperature: self.config.temperature,
                    num_predict: self.config.max_tokens,
                },
            })
            .send()
            .await
        {
            Ok(r) => r,
            Err(_) => return Ok(None),
        };
        let parsed: OllamaResponse = match response.json().await {
            Ok(p) => p,
            Err(_) => return Ok(None),
        };
        Ok(Some(clean_summary(&parsed.response)))
    }
}

/// Strips `<think>...</think>` scaffolding some models emit, normalises
/// whitespace, and truncates to [`MAX_SUMMARY_WORDS`] words.
fn clean_summary(raw: &str) -> String {
    let mut text = raw.to_string();
    while let Some(start) = text.find("<think>") {
        if let Some(end) = text[start..].find("</think>") {
            let end = start + end + "</think>".len();
            text.replace_range(start..end, "");
        } else {
            break;
        }
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .into_iter()
        .take(MAX_SUMMARY_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_think_scaffolding() {
        let raw = "<think>internal reasoning</think>The document concerns a budget.";
        assert_eq!(clean_summary(raw), "The document concerns a budget.");
    }

    #[test]
    fn truncates_to_word_budget() {
        let raw = (0..300).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let cleaned = clean_summary(&raw);
        assert_eq!(cleaned.split_whitespace().count(), MAX_SUMMARY_WORDS);
    }
}
