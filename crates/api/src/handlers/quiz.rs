//! Handlers for quiz rounds: start, questions, answers, finish.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use vocab_core::card::bronze_card_draft;
use vocab_core::error::CoreError;
use vocab_core::grading::{build_question, grade, AnswerInput, Question};
use vocab_core::mastery::CardChange;
use vocab_core::selection::QUIZ_BATCH_SIZE;
use vocab_core::types::DbId;
use vocab_db::models::quiz::{QuizRound, RecordAnswer, RecordOutcome};
use vocab_db::repositories::{QuizAnswerRepo, QuizRoundRepo, VocabEntryRepo};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct StartQuizResponse {
    pub quiz_round_id: DbId,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuestionsQuery {
    pub quiz_round_id: Option<DbId>,
}

/// Body of `POST /api/vocab/quiz/answer`. Exactly one of `selected_option`
/// (multiple choice) or `user_answer` (free text) is expected.
#[derive(Debug, Default, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub quiz_round_id: Option<DbId>,
    #[serde(default)]
    pub vocab_entry_id: Option<DbId>,
    #[serde(default)]
    pub selected_option: Option<i64>,
    #[serde(default)]
    pub user_answer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub correct: bool,
    pub accuracy_percent: f64,
    pub card_change: CardChange,
    pub card_unlocked: bool,
    pub card_id: Option<DbId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FinishQuizRequest {
    #[serde(default)]
    pub quiz_round_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require<T>(value: Option<T>, field: &str) -> Result<T, CoreError> {
    value.ok_or_else(|| CoreError::Validation(format!("{field} required")))
}

async fn find_round(state: &AppState, user_id: DbId, id: DbId) -> AppResult<QuizRound> {
    let round = QuizRoundRepo::find_for_user(&state.pool, user_id, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "quiz_round",
            id,
        })?;
    Ok(round)
}

fn round_finished(id: DbId) -> CoreError {
    CoreError::Conflict(format!("quiz round {id} is already finished"))
}

fn ensure_open(round: &QuizRound) -> Result<(), CoreError> {
    if round.is_finished() {
        return Err(round_finished(round.id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/vocab/quiz/start
pub async fn start_quiz(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<StartQuizResponse>> {
    let round = QuizRoundRepo::create(&state.pool, user.user_id).await?;

    tracing::info!(user_id = user.user_id, quiz_round_id = round.id, "Quiz round started");

    Ok(Json(StartQuizResponse {
        quiz_round_id: round.id,
    }))
}

/// GET /api/vocab/quiz/next
///
/// Up to ten questions picked by the configured selection policy. The
/// option order of a question depends only on its entry, so a served
/// `correct_index` stays valid in any round. A given `quiz_round_id` must
/// belong to the user and still be open.
pub async fn next_questions(
    user: CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<NextQuestionsQuery>,
) -> AppResult<Json<Vec<Question>>> {
    if let Some(id) = query.quiz_round_id {
        ensure_open(&find_round(&state, user.user_id, id).await?)?;
    }

    let entries = VocabEntryRepo::list_for_quiz(
        &state.pool,
        user.user_id,
        state.config.selection_policy,
        QUIZ_BATCH_SIZE,
    )
    .await?;

    let questions = entries
        .iter()
        .map(|e| {
            build_question(
                state.distractors.as_ref(),
                e.id,
                &e.latin_word,
                &e.german_translation,
            )
        })
        .collect();

    Ok(Json(questions))
}

/// POST /api/vocab/quiz/answer
///
/// Grade the answer, then update the entry's counters and card ownership
/// in one transaction.
pub async fn answer_question(
    user: CurrentUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<AnswerRequest>,
) -> AppResult<Json<AnswerResponse>> {
    let round_id = require(input.quiz_round_id, "quiz_round_id")?;
    let entry_id = require(input.vocab_entry_id, "vocab_entry_id")?;
    let answer = AnswerInput::from_parts(input.selected_option, input.user_answer)?;

    // Checked again under lock when the answer is recorded.
    let round = find_round(&state, user.user_id, round_id).await?;
    ensure_open(&round)?;

    let not_found = || CoreError::NotFound {
        entity: "vocab_entry",
        id: entry_id,
    };
    let entry = VocabEntryRepo::find_for_user(&state.pool, user.user_id, entry_id)
        .await?
        .ok_or_else(not_found)?;

    let question = build_question(
        state.distractors.as_ref(),
        entry.id,
        &entry.latin_word,
        &entry.german_translation,
    );
    let correct = grade(&answer, &entry.german_translation, &question)?;

    let draft = bronze_card_draft(
        &entry.latin_word,
        &entry.german_translation,
        &state.config.card_image_url,
    );
    let outcome = QuizAnswerRepo::record(
        &state.pool,
        &RecordAnswer {
            user_id: user.user_id,
            quiz_round_id: round.id,
            vocab_entry_id: entry.id,
            was_correct: correct,
        },
        state.config.mastery_policy,
        &draft,
    )
    .await?;
    let record = match outcome {
        RecordOutcome::Recorded(record) => record,
        RecordOutcome::EntryNotFound => return Err(not_found().into()),
        RecordOutcome::RoundNotFound => {
            return Err(CoreError::NotFound {
                entity: "quiz_round",
                id: round_id,
            }
            .into())
        }
        RecordOutcome::RoundFinished => return Err(round_finished(round_id).into()),
    };

    tracing::info!(
        user_id = user.user_id,
        quiz_round_id = round.id,
        entry_id = entry.id,
        correct,
        accuracy = record.accuracy_percent,
        card_change = record.card_change.as_str(),
        "Quiz answer recorded",
    );

    Ok(Json(AnswerResponse {
        correct,
        accuracy_percent: record.accuracy_percent,
        card_change: record.card_change,
        card_unlocked: record.card_change == CardChange::Unlocked,
        card_id: record.card_id,
    }))
}

/// POST /api/vocab/quiz/finish
///
/// Idempotent: the first call stamps `finished_at`, later calls keep it.
pub async fn finish_quiz(
    user: CurrentUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<FinishQuizRequest>,
) -> AppResult<Json<StatusResponse>> {
    let round_id = require(input.quiz_round_id, "quiz_round_id")?;

    let round = QuizRoundRepo::finish(&state.pool, user.user_id, round_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "quiz_round",
            id: round_id,
        })?;

    tracing::info!(
        user_id = user.user_id,
        quiz_round_id = round.id,
        finished_at = ?round.finished_at,
        "Quiz round finished",
    );

    Ok(Json(StatusResponse { status: "ok" }))
}
