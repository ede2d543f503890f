//! Repository for the `users` table.

use sqlx::PgPool;
use vocab_core::types::DbId;

use crate::models::user::User;

const COLUMNS: &str = "id, username, created_at";

/// Provides lookups and creation for users.
pub struct UserRepo;

impl UserRepo {
    /// Create a user, returning the new row.
    pub async fn create(pool: &PgPool, username: &str) -> Result<User, sqlx::Error> {
        let query = format!("INSERT INTO users (username) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
