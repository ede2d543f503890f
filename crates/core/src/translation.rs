//! Translation suggestions for entries submitted without a translation.

use std::time::Duration;

use async_trait::async_trait;

/// Errors from a translation suggestion backend.
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    /// The backend could not be reached or answered with an error.
    #[error("Translation service unavailable: {0}")]
    Unavailable(String),

    /// The backend did not answer in time.
    #[error("Translation service timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
}

/// External service proposing translations for a Latin word.
#[async_trait]
pub trait TranslationSuggester: Send + Sync {
    async fn suggest(&self, latin_word: &str) -> Result<Vec<String>, TranslationError>;
}

/// Fixed suggestions used when no translation service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderSuggester;

pub const PLACEHOLDER_SUGGESTIONS: [&str; 2] = ["<AI-translation-1>", "<AI-translation-2>"];

#[async_trait]
impl TranslationSuggester for PlaceholderSuggester {
    async fn suggest(&self, _latin_word: &str) -> Result<Vec<String>, TranslationError> {
        Ok(PLACEHOLDER_SUGGESTIONS
            .iter()
            .map(|s| (*s).to_string())
            .collect())
    }
}

/// Ask `suggester` for suggestions, giving up after `timeout`.
///
/// Blank and duplicate suggestions are dropped.
pub async fn suggest_within(
    suggester: &dyn TranslationSuggester,
    latin_word: &str,
    timeout: Duration,
) -> Result<Vec<String>, TranslationError> {
    let raw = tokio::time::timeout(timeout, suggester.suggest(latin_word))
        .await
        .map_err(|_| TranslationError::Timeout {
            elapsed_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        })??;

    let mut suggestions: Vec<String> = Vec::with_capacity(raw.len());
    for s in raw {
        let s = s.trim().to_string();
        if !s.is_empty() && !suggestions.contains(&s) {
            suggestions.push(s);
        }
    }
    Ok(suggestions)
}
