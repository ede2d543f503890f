#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use vocab_api::config::{AuthMode, CorsOrigins, ServerConfig};
use vocab_api::router::build_app_router;
use vocab_api::state::AppState;
use vocab_core::card::DEFAULT_CARD_IMAGE_URL;
use vocab_core::distractors::PlaceholderDistractors;
use vocab_core::mastery::MasteryPolicy;
use vocab_core::selection::SelectionPolicy;
use vocab_core::translation::{PlaceholderSuggester, TranslationSuggester};

/// Build a test `ServerConfig` with safe defaults.
///
/// Runs as the seeded default user and serves no static files.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: CorsOrigins::List(vec!["http://localhost:5173".parse().unwrap()]),
        request_timeout_secs: 30,
        static_dir: None,
        database_max_connections: 5,
        auth: AuthMode::Fixed { user_id: 1 },
        mastery_policy: MasteryPolicy::Revised,
        selection_policy: SelectionPolicy::Weak,
        translation_service_url: None,
        translation_timeout: Duration::from_secs(2),
        card_image_url: DEFAULT_CARD_IMAGE_URL.to_string(),
    }
}

/// Build the application router with a custom config and translator.
pub fn build_app_with(
    pool: PgPool,
    config: ServerConfig,
    translator: Arc<dyn TranslationSuggester>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        distractors: Arc::new(PlaceholderDistractors),
        translator,
    };
    build_app_router(state, &config)
}

/// Build the full application router, with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with(pool, test_config(), Arc::new(PlaceholderSuggester))
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Add an entry through the API and return its id.
pub async fn create_entry(pool: &PgPool, latin: &str, german: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/vocab/",
        serde_json::json!({"latin_word": latin, "german_translation": german}),
    )
    .await;
    body_json(response).await["id"].as_i64().unwrap()
}

/// Start a round through the API and return its id.
pub async fn start_round(pool: &PgPool) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/vocab/quiz/start",
        serde_json::json!({}),
    )
    .await;
    body_json(response).await["quiz_round_id"].as_i64().unwrap()
}
