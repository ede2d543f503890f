//! Vocabulary entry model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use vocab_core::mastery::AnswerStats;
use vocab_core::types::{DbId, Timestamp};

/// A row from the `vocab_entries` table.
///
/// `accuracy_percent` is a generated column and `has_bronze_card` is
/// computed from card ownership at read time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VocabEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub latin_word: String,
    pub german_translation: String,
    pub total_answers: i32,
    pub correct_answers: i32,
    pub accuracy_percent: f64,
    pub has_bronze_card: bool,
    pub created_at: Timestamp,
}

impl VocabEntry {
    pub fn stats(&self) -> AnswerStats {
        AnswerStats::new(self.total_answers, self.correct_answers)
    }
}

/// DTO for inserting a new entry. Fields are expected to be validated.
#[derive(Debug, Clone)]
pub struct CreateVocabEntry {
    pub latin_word: String,
    pub german_translation: String,
}
