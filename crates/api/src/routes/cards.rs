//! Route definitions for the card collection.

use axum::routing::get;
use axum::Router;

use crate::handlers::cards;
use crate::state::AppState;

/// Routes mounted under `/api`.
///
/// ```text
/// GET    /cards/    -> list_cards
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cards", get(cards::list_cards))
        .route("/cards/", get(cards::list_cards))
}
