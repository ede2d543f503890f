//! Quiz round and answer models.

use serde::Serialize;
use sqlx::FromRow;
use vocab_core::mastery::{AnswerStats, CardChange};
use vocab_core::types::{DbId, Timestamp};

/// A row from the `quiz_rounds` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizRound {
    pub id: DbId,
    pub user_id: DbId,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
}

impl QuizRound {
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

/// A row from the `quiz_answers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizAnswer {
    pub id: DbId,
    pub quiz_round_id: DbId,
    pub vocab_entry_id: DbId,
    pub was_correct: bool,
    pub answered_at: Timestamp,
}

/// An already graded answer to persist.
#[derive(Debug, Clone)]
pub struct RecordAnswer {
    pub user_id: DbId,
    pub quiz_round_id: DbId,
    pub vocab_entry_id: DbId,
    pub was_correct: bool,
}

/// Everything the answer transaction changed.
#[derive(Debug, Clone)]
pub struct AnswerRecord {
    pub answer: QuizAnswer,
    pub stats: AnswerStats,
    pub accuracy_percent: f64,
    pub card_change: CardChange,
    /// Card created, granted or revoked by this answer.
    pub card_id: Option<DbId>,
}

/// Result of the answer transaction. Only `Recorded` wrote anything.
#[derive(Debug, Clone)]
pub enum RecordOutcome {
    Recorded(AnswerRecord),
    /// The user has no such round.
    RoundNotFound,
    /// The round was finished before the answer could be recorded.
    RoundFinished,
    /// The user has no such entry.
    EntryNotFound,
}
