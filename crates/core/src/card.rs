//! Reward card content.

/// Rarity tag for cards earned by mastering an entry.
pub const RARITY_BRONZE: &str = "bronze";

/// Image shown on cards until artwork generation exists.
pub const DEFAULT_CARD_IMAGE_URL: &str = "https://example.com/generated-image.png";

/// Content for a card about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub rarity: &'static str,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

/// Bronze card for a mastered word pair.
pub fn bronze_card_draft(latin_word: &str, translation: &str, image_url: &str) -> CardDraft {
    CardDraft {
        rarity: RARITY_BRONZE,
        title: latin_word.to_string(),
        description: format!("{latin_word} ({translation}): mastered in bronze."),
        image_url: image_url.to_string(),
    }
}
