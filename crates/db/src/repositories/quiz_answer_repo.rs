//! Repository for the `quiz_answers` table and the answer transaction.

use sqlx::PgPool;
use vocab_core::card::CardDraft;
use vocab_core::mastery::{evaluate_answer, CardChange, MasteryPolicy};
use vocab_core::types::DbId;

use crate::models::quiz::{AnswerRecord, QuizAnswer, RecordAnswer, RecordOutcome};
use crate::repositories::{CardRepo, QuizRoundRepo, VocabEntryRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, quiz_round_id, vocab_entry_id, was_correct, answered_at";

/// Provides the answer audit log and the mastery update.
pub struct QuizAnswerRepo;

impl QuizAnswerRepo {
    /// Record a graded answer and apply its mastery consequences atomically.
    ///
    /// In one transaction: share-lock the round and check it is still open,
    /// lock the entry row, update its counters, append the answer, and
    /// create or revoke the bronze card as `policy` decides. `draft` is only
    /// used when a card has to be created. Concurrent answers for the same
    /// entry serialize on the row lock; a concurrent finish waits for the
    /// round lock.
    ///
    /// Nothing is written unless the outcome is [`RecordOutcome::Recorded`].
    pub async fn record(
        pool: &PgPool,
        input: &RecordAnswer,
        policy: MasteryPolicy,
        draft: &CardDraft,
    ) -> Result<RecordOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        match QuizRoundRepo::lock_for_answer(&mut tx, input.user_id, input.quiz_round_id).await? {
            None => return Ok(RecordOutcome::RoundNotFound),
            Some(round) if round.is_finished() => return Ok(RecordOutcome::RoundFinished),
            Some(_) => {}
        }

        let Some(entry) =
            VocabEntryRepo::lock_for_update(&mut tx, input.user_id, input.vocab_entry_id).await?
        else {
            return Ok(RecordOutcome::EntryNotFound);
        };

        let outcome = evaluate_answer(
            policy,
            entry.stats(),
            input.was_correct,
            entry.has_bronze_card,
        );

        VocabEntryRepo::set_counters(
            &mut tx,
            entry.id,
            outcome.stats.total_answers,
            outcome.stats.correct_answers,
        )
        .await?;

        let query = format!(
            "INSERT INTO quiz_answers (quiz_round_id, vocab_entry_id, was_correct) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let answer = sqlx::query_as::<_, QuizAnswer>(&query)
            .bind(input.quiz_round_id)
            .bind(entry.id)
            .bind(input.was_correct)
            .fetch_one(&mut *tx)
            .await?;

        let (card_change, card_id) = match outcome.card_change {
            CardChange::Unlocked => {
                let (card_id, granted) =
                    CardRepo::grant(&mut tx, input.user_id, entry.id, draft).await?;
                if granted {
                    (CardChange::Unlocked, Some(card_id))
                } else {
                    (CardChange::Unchanged, None)
                }
            }
            CardChange::Revoked => {
                match CardRepo::revoke_bronze(&mut tx, input.user_id, entry.id).await? {
                    Some(card_id) => (CardChange::Revoked, Some(card_id)),
                    None => (CardChange::Unchanged, None),
                }
            }
            CardChange::Unchanged => (CardChange::Unchanged, None),
        };

        tx.commit().await?;

        Ok(RecordOutcome::Recorded(AnswerRecord {
            answer,
            stats: outcome.stats,
            accuracy_percent: outcome.accuracy_percent,
            card_change,
            card_id,
        }))
    }

    /// List the answers given in a round, oldest first.
    pub async fn list_by_round(
        pool: &PgPool,
        quiz_round_id: DbId,
    ) -> Result<Vec<QuizAnswer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quiz_answers WHERE quiz_round_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, QuizAnswer>(&query)
            .bind(quiz_round_id)
            .fetch_all(pool)
            .await
    }

    /// Number of answers recorded for an entry.
    pub async fn count_for_entry(pool: &PgPool, vocab_entry_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM quiz_answers WHERE vocab_entry_id = $1")
                .bind(vocab_entry_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
