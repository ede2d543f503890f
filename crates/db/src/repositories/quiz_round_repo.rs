//! Repository for the `quiz_rounds` table.

use sqlx::{PgConnection, PgPool};
use vocab_core::types::DbId;

use crate::models::quiz::QuizRound;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, started_at, finished_at";

/// Provides lifecycle operations for quiz rounds.
pub struct QuizRoundRepo;

impl QuizRoundRepo {
    /// Start a new round for a user.
    pub async fn create(pool: &PgPool, user_id: DbId) -> Result<QuizRound, sqlx::Error> {
        let query = format!("INSERT INTO quiz_rounds (user_id) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, QuizRound>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a round owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<QuizRound>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quiz_rounds WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, QuizRound>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Read a round inside a transaction, holding a share lock until it
    /// ends so the round cannot be finished concurrently.
    pub async fn lock_for_answer(
        conn: &mut PgConnection,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<QuizRound>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quiz_rounds WHERE id = $1 AND user_id = $2 FOR SHARE"
        );
        sqlx::query_as::<_, QuizRound>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Mark a round finished.
    ///
    /// `finished_at` is only set the first time; finishing again returns the
    /// round unchanged. Returns `None` if the user has no such round.
    pub async fn finish(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<QuizRound>, sqlx::Error> {
        let query = format!(
            "UPDATE quiz_rounds SET finished_at = COALESCE(finished_at, NOW()) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuizRound>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
