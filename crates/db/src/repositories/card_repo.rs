//! Repository for the `cards` and `user_cards` tables.

use sqlx::{PgConnection, PgPool};
use vocab_core::card::{CardDraft, RARITY_BRONZE};
use vocab_core::types::DbId;

use crate::models::card::{Card, OwnedCard};

/// Column list for `cards` queries.
const COLUMNS: &str = "id, vocab_entry_id, rarity, title, description, image_url, created_at";

/// Provides the card ledger: creation, ownership and orphan cleanup.
pub struct CardRepo;

impl CardRepo {
    /// List the cards a user owns, most recently acquired first.
    pub async fn list_owned(pool: &PgPool, user_id: DbId) -> Result<Vec<OwnedCard>, sqlx::Error> {
        sqlx::query_as::<_, OwnedCard>(
            "SELECT c.id AS card_id, c.vocab_entry_id, c.rarity, c.title, c.description, \
                    c.image_url, v.latin_word, v.german_translation, uc.acquired_at \
             FROM user_cards uc \
             JOIN cards c ON c.id = uc.card_id \
             JOIN vocab_entries v ON v.id = c.vocab_entry_id \
             WHERE uc.user_id = $1 \
             ORDER BY uc.acquired_at DESC, c.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Find the card of a given rarity for an entry.
    pub async fn find_for_entry(
        pool: &PgPool,
        vocab_entry_id: DbId,
        rarity: &str,
    ) -> Result<Option<Card>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cards WHERE vocab_entry_id = $1 AND rarity = $2"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(vocab_entry_id)
            .bind(rarity)
            .fetch_optional(pool)
            .await
    }

    /// Number of users owning a card.
    pub async fn owner_count(pool: &PgPool, card_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_cards WHERE card_id = $1")
            .bind(card_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Give `user_id` the entry's card described by `draft`, creating the
    /// card if it does not exist yet. Returns the card id and whether a new
    /// ownership row was written.
    pub async fn grant(
        conn: &mut PgConnection,
        user_id: DbId,
        vocab_entry_id: DbId,
        draft: &CardDraft,
    ) -> Result<(DbId, bool), sqlx::Error> {
        let inserted: Option<(DbId,)> = sqlx::query_as(
            "INSERT INTO cards (vocab_entry_id, rarity, title, description, image_url) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_cards_entry_rarity DO NOTHING \
             RETURNING id",
        )
        .bind(vocab_entry_id)
        .bind(draft.rarity)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.image_url)
        .fetch_optional(&mut *conn)
        .await?;

        let card_id = match inserted {
            Some((id,)) => id,
            None => {
                let existing: (DbId,) = sqlx::query_as(
                    "SELECT id FROM cards WHERE vocab_entry_id = $1 AND rarity = $2",
                )
                .bind(vocab_entry_id)
                .bind(draft.rarity)
                .fetch_one(&mut *conn)
                .await?;
                existing.0
            }
        };

        let granted = sqlx::query(
            "INSERT INTO user_cards (user_id, card_id) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_user_cards_user_card DO NOTHING",
        )
        .bind(user_id)
        .bind(card_id)
        .execute(&mut *conn)
        .await?;

        Ok((card_id, granted.rows_affected() > 0))
    }

    /// Take the entry's bronze card away from `user_id` and delete the card
    /// once nobody owns it. Returns the card id if an ownership row was
    /// removed.
    pub async fn revoke_bronze(
        conn: &mut PgConnection,
        user_id: DbId,
        vocab_entry_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let removed: Option<(DbId,)> = sqlx::query_as(
            "DELETE FROM user_cards uc \
             USING cards c \
             WHERE uc.card_id = c.id \
               AND uc.user_id = $1 \
               AND c.vocab_entry_id = $2 \
               AND c.rarity = $3 \
             RETURNING c.id",
        )
        .bind(user_id)
        .bind(vocab_entry_id)
        .bind(RARITY_BRONZE)
        .fetch_optional(&mut *conn)
        .await?;

        let Some((card_id,)) = removed else {
            return Ok(None);
        };

        let orphan = sqlx::query(
            "DELETE FROM cards \
             WHERE id = $1 AND NOT EXISTS (SELECT 1 FROM user_cards WHERE card_id = $1)",
        )
        .bind(card_id)
        .execute(&mut *conn)
        .await?;
        if orphan.rows_affected() > 0 {
            tracing::debug!(card_id, "Deleted orphaned card");
        }

        Ok(Some(card_id))
    }
}
