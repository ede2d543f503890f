use std::sync::Arc;

use vocab_core::distractors::DistractorGenerator;
use vocab_core::translation::TranslationSuggester;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vocab_db::DbPool,
    /// Server configuration (identity mode, mastery and selection policies).
    pub config: Arc<ServerConfig>,
    /// Wrong options for multiple-choice questions.
    pub distractors: Arc<dyn DistractorGenerator>,
    /// Translation suggestions for entries submitted without one.
    pub translator: Arc<dyn TranslationSuggester>,
}
