//! Liveness endpoint, mounted at the root rather than under `/api`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub mastery_policy: &'static str,
    pub selection_policy: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match vocab_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        mastery_policy: state.config.mastery_policy.as_str(),
        selection_policy: state.config.selection_policy.as_str(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
