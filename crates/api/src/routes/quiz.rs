//! Route definitions for quiz rounds.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::quiz;
use crate::state::AppState;

/// Routes mounted at `/api/vocab/quiz`.
///
/// ```text
/// POST   /start     -> start_quiz
/// GET    /next      -> next_questions
/// POST   /answer    -> answer_question
/// POST   /finish    -> finish_quiz
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(quiz::start_quiz))
        .route("/next", get(quiz::next_questions))
        .route("/answer", post(quiz::answer_question))
        .route("/finish", post(quiz::finish_quiz))
}
