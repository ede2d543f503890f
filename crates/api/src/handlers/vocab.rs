//! Handlers for listing and adding vocabulary entries.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use vocab_core::translation::suggest_within;
use vocab_core::types::DbId;
use vocab_core::vocab::{validate_submission, EntrySubmission};
use vocab_db::models::vocab_entry::{CreateVocabEntry, VocabEntry};
use vocab_db::repositories::VocabEntryRepo;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /api/vocab/`. A missing translation asks for suggestions.
#[derive(Debug, Default, Deserialize)]
pub struct CreateVocabRequest {
    #[serde(default)]
    pub latin_word: Option<String>,
    #[serde(default)]
    pub german_translation: Option<String>,
}

/// One row of the vocabulary list.
#[derive(Debug, Serialize)]
pub struct VocabListItem {
    pub id: DbId,
    pub latin_word: String,
    pub german_translation: String,
    pub total_answers: i32,
    pub correct_answers: i32,
    pub accuracy_percent: f64,
    pub has_bronze_card: bool,
}

impl From<VocabEntry> for VocabListItem {
    fn from(e: VocabEntry) -> Self {
        Self {
            id: e.id,
            latin_word: e.latin_word,
            german_translation: e.german_translation,
            total_answers: e.total_answers,
            correct_answers: e.correct_answers,
            accuracy_percent: e.accuracy_percent,
            has_bronze_card: e.has_bronze_card,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedEntry {
    pub id: DbId,
}

/// Returned instead of persisting when no translation was given.
#[derive(Debug, Serialize)]
pub struct TranslationPrompt {
    pub need_translation_choice: bool,
    pub suggestions: Vec<String>,
    pub suggestions_available: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/vocab/
///
/// List the user's entries, newest first.
pub async fn list_vocab(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<VocabListItem>>> {
    let entries = VocabEntryRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(entries.into_iter().map(VocabListItem::from).collect()))
}

/// POST /api/vocab/
///
/// Persist a word pair (201), or return translation suggestions (200) when
/// the translation is missing. Suggestion failures degrade to an empty list.
pub async fn create_vocab(
    user: CurrentUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateVocabRequest>,
) -> AppResult<Response> {
    let submission = validate_submission(
        input.latin_word.as_deref(),
        input.german_translation.as_deref(),
    )?;

    match submission {
        EntrySubmission::Complete {
            latin_word,
            german_translation,
        } => {
            let id = VocabEntryRepo::create(
                &state.pool,
                user.user_id,
                &CreateVocabEntry {
                    latin_word,
                    german_translation,
                },
            )
            .await?;

            tracing::info!(user_id = user.user_id, entry_id = id, "Vocabulary entry created");

            Ok((StatusCode::CREATED, Json(CreatedEntry { id })).into_response())
        }
        EntrySubmission::NeedsTranslation { latin_word } => {
            let prompt = match suggest_within(
                state.translator.as_ref(),
                &latin_word,
                state.config.translation_timeout,
            )
            .await
            {
                Ok(suggestions) => TranslationPrompt {
                    need_translation_choice: true,
                    suggestions,
                    suggestions_available: true,
                },
                Err(e) => {
                    tracing::warn!(error = %e, latin_word = %latin_word, "Translation suggestions unavailable");
                    TranslationPrompt {
                        need_translation_choice: true,
                        suggestions: Vec::new(),
                        suggestions_available: false,
                    }
                }
            };

            Ok((StatusCode::OK, Json(prompt)).into_response())
        }
    }
}
