//! HTTP client for an external translation suggestion service.
//!
//! The service receives `POST {url}` with `{"word", "source", "target"}`
//! and answers `{"suggestions": [...]}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vocab_core::translation::{TranslationError, TranslationSuggester};

/// Suggests German translations for Latin words over HTTP.
pub struct HttpTranslationSuggester {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Serialize)]
struct SuggestRequest<'a> {
    word: &'a str,
    source: &'static str,
    target: &'static str,
}

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    suggestions: Vec<String>,
}

impl HttpTranslationSuggester {
    /// Create a client for the service at `url`. Requests are abandoned
    /// after `timeout`.
    pub fn new(url: String, timeout: Duration) -> Result<Self, TranslationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslationError::Unavailable(e.to_string()))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl TranslationSuggester for HttpTranslationSuggester {
    async fn suggest(&self, latin_word: &str) -> Result<Vec<String>, TranslationError> {
        let response = self
            .client
            .post(&self.url)
            .json(&SuggestRequest {
                word: latin_word,
                source: "la",
                target: "de",
            })
            .send()
            .await
            .map_err(|e| TranslationError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Unavailable(format!(
                "status {}: {body}",
                status.as_u16()
            )));
        }

        let parsed: SuggestResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::Unavailable(e.to_string()))?;

        tracing::debug!(
            word = latin_word,
            count = parsed.suggestions.len(),
            "Translation suggestions received",
        );
        Ok(parsed.suggestions)
    }
}
