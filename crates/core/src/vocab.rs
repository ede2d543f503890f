//! Validation of submitted vocabulary entries.

use crate::error::CoreError;

/// Maximum length of a Latin word, in characters.
pub const MAX_LATIN_WORD_LEN: usize = 120;

/// Maximum length of a translation, in characters.
pub const MAX_TRANSLATION_LEN: usize = 255;

/// A validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySubmission {
    /// Both sides present; ready to persist.
    Complete {
        latin_word: String,
        german_translation: String,
    },
    /// Translation missing; the client should pick from suggestions.
    NeedsTranslation { latin_word: String },
}

/// Trim and validate the raw request fields.
pub fn validate_submission(
    latin_word: Option<&str>,
    german_translation: Option<&str>,
) -> Result<EntrySubmission, CoreError> {
    let latin = latin_word.map(str::trim).unwrap_or_default();
    if latin.is_empty() {
        return Err(CoreError::Validation("latin_word required".to_string()));
    }
    if latin.chars().count() > MAX_LATIN_WORD_LEN {
        return Err(CoreError::Validation(format!(
            "latin_word must be at most {MAX_LATIN_WORD_LEN} characters"
        )));
    }

    let german = german_translation.map(str::trim).unwrap_or_default();
    if german.is_empty() {
        return Ok(EntrySubmission::NeedsTranslation {
            latin_word: latin.to_string(),
        });
    }
    if german.chars().count() > MAX_TRANSLATION_LEN {
        return Err(CoreError::Validation(format!(
            "german_translation must be at most {MAX_TRANSLATION_LEN} characters"
        )));
    }

    Ok(EntrySubmission::Complete {
        latin_word: latin.to_string(),
        german_translation: german.to_string(),
    })
}
