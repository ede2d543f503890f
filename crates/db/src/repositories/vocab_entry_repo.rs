//! Repository for the `vocab_entries` table.

use sqlx::{PgConnection, PgPool};
use vocab_core::card::RARITY_BRONZE;
use vocab_core::selection::{SelectionPolicy, WEAK_ACCURACY_BELOW, WEAK_MIN_ANSWERS};
use vocab_core::types::DbId;

use crate::models::vocab_entry::{CreateVocabEntry, VocabEntry};

/// `SELECT ... FROM vocab_entries v` with the derived `has_bronze_card`
/// flag. Callers append `WHERE` / `ORDER BY` clauses.
fn select_entries() -> String {
    format!(
        "SELECT v.id, v.user_id, v.latin_word, v.german_translation, \
             v.total_answers, v.correct_answers, v.accuracy_percent, \
             EXISTS ( \
                 SELECT 1 FROM cards c \
                 JOIN user_cards uc ON uc.card_id = c.id \
                 WHERE c.vocab_entry_id = v.id \
                   AND c.rarity = '{RARITY_BRONZE}' \
                   AND uc.user_id = v.user_id \
             ) AS has_bronze_card, \
             v.created_at \
         FROM vocab_entries v"
    )
}

/// Provides CRUD and quiz-selection queries for vocabulary entries.
/// Every query is scoped to the owning user.
pub struct VocabEntryRepo;

impl VocabEntryRepo {
    /// Insert a new entry with zeroed counters, returning its id.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateVocabEntry,
    ) -> Result<DbId, sqlx::Error> {
        let row: (DbId,) = sqlx::query_as(
            "INSERT INTO vocab_entries (user_id, latin_word, german_translation) \
             VALUES ($1, $2, $3) \
             RETURNING id",
        )
        .bind(user_id)
        .bind(&input.latin_word)
        .bind(&input.german_translation)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Find an entry owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<VocabEntry>, sqlx::Error> {
        let query = format!("{} WHERE v.id = $1 AND v.user_id = $2", select_entries());
        sqlx::query_as::<_, VocabEntry>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List all of a user's entries, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<VocabEntry>, sqlx::Error> {
        let query = format!(
            "{} WHERE v.user_id = $1 ORDER BY v.created_at DESC, v.id DESC",
            select_entries()
        );
        sqlx::query_as::<_, VocabEntry>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Pick up to `limit` entries to quiz the user on.
    ///
    /// [`SelectionPolicy::Weak`] returns the weakest entries first;
    /// [`SelectionPolicy::First`] returns entries in insertion order.
    pub async fn list_for_quiz(
        pool: &PgPool,
        user_id: DbId,
        policy: SelectionPolicy,
        limit: i64,
    ) -> Result<Vec<VocabEntry>, sqlx::Error> {
        match policy {
            SelectionPolicy::Weak => {
                let query = format!(
                    "{} WHERE v.user_id = $1 \
                       AND (v.accuracy_percent < $2 OR v.total_answers < $3) \
                     ORDER BY v.accuracy_percent ASC, v.total_answers ASC, v.id ASC \
                     LIMIT $4",
                    select_entries()
                );
                sqlx::query_as::<_, VocabEntry>(&query)
                    .bind(user_id)
                    .bind(WEAK_ACCURACY_BELOW)
                    .bind(WEAK_MIN_ANSWERS)
                    .bind(limit)
                    .fetch_all(pool)
                    .await
            }
            SelectionPolicy::First => {
                let query = format!(
                    "{} WHERE v.user_id = $1 ORDER BY v.id ASC LIMIT $2",
                    select_entries()
                );
                sqlx::query_as::<_, VocabEntry>(&query)
                    .bind(user_id)
                    .bind(limit)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Lock an entry row for the rest of the transaction and return its
    /// current state.
    ///
    /// The lock is taken by a separate statement so the returned row,
    /// including card ownership, reflects everything committed before the
    /// lock was granted.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<VocabEntry>, sqlx::Error> {
        let locked: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM vocab_entries WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let query = format!("{} WHERE v.id = $1", select_entries());
        sqlx::query_as::<_, VocabEntry>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Overwrite the answer counters. Accuracy follows automatically.
    pub async fn set_counters(
        conn: &mut PgConnection,
        id: DbId,
        total_answers: i32,
        correct_answers: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE vocab_entries SET total_answers = $2, correct_answers = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(total_answers)
        .bind(correct_answers)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
