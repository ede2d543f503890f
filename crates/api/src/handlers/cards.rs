//! Handlers for the card collection.

use axum::extract::State;
use axum::Json;
use vocab_db::models::card::OwnedCard;
use vocab_db::repositories::CardRepo;

use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// GET /api/cards/
///
/// Cards the user owns, joined with the word pair each was earned for.
pub async fn list_cards(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<OwnedCard>>> {
    let cards = CardRepo::list_owned(&state.pool, user.user_id).await?;
    Ok(Json(cards))
}
