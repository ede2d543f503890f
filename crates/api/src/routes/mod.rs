pub mod cards;
pub mod health;
pub mod quiz;
pub mod vocab;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /vocab/                  list, add entries
/// /vocab/quiz/start        start a round (POST)
/// /vocab/quiz/next         next questions (GET)
/// /vocab/quiz/answer       submit an answer (POST)
/// /vocab/quiz/finish       finish a round (POST)
///
/// /cards/                  owned cards (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(vocab::router())
        .nest("/vocab/quiz", quiz::router())
        .merge(cards::router())
}
