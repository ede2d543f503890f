//! Route definitions for vocabulary entries.

use axum::routing::get;
use axum::Router;

use crate::handlers::vocab;
use crate::state::AppState;

/// Routes mounted under `/api`. Both `/vocab` and `/vocab/` are served.
///
/// ```text
/// GET    /vocab/    -> list_vocab
/// POST   /vocab/    -> create_vocab
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vocab", get(vocab::list_vocab).post(vocab::create_vocab))
        .route("/vocab/", get(vocab::list_vocab).post(vocab::create_vocab))
}
