//! Card models. Ownership rows in `user_cards` are only read joined, as
//! [`OwnedCard`].

use serde::Serialize;
use sqlx::FromRow;
use vocab_core::types::{DbId, Timestamp};

/// A row from the `cards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Card {
    pub id: DbId,
    pub vocab_entry_id: DbId,
    pub rarity: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub created_at: Timestamp,
}

/// A card owned by a user, joined with the entry it was earned for.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OwnedCard {
    pub card_id: DbId,
    pub vocab_entry_id: DbId,
    pub rarity: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub latin_word: String,
    pub german_translation: String,
    pub acquired_at: Timestamp,
}
