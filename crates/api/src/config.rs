use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use vocab_core::card::DEFAULT_CARD_IMAGE_URL;
use vocab_core::mastery::MasteryPolicy;
use vocab_core::selection::SelectionPolicy;
use vocab_core::types::DbId;

use crate::auth::jwt::JwtConfig;

/// A configuration value that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is required")]
    Missing { key: &'static str },

    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which identity every request runs as.
#[derive(Debug, Clone)]
pub enum AuthMode {
    /// Every request acts as the same user (single-user deployments).
    Fixed { user_id: DbId },
    /// The user id comes from an HS256 bearer token.
    Jwt(JwtConfig),
}

/// Allowed CORS origins.
#[derive(Debug, Clone)]
pub enum CorsOrigins {
    Any,
    List(Vec<HeaderValue>),
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Parsed from comma-separated `CORS_ORIGINS`; `*` allows any origin.
    pub cors_origins: CorsOrigins,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory served at `/` for the browser client. Empty disables it.
    pub static_dir: Option<String>,
    /// Maximum database connections (default: `20`).
    pub database_max_connections: u32,
    pub auth: AuthMode,
    pub mastery_policy: MasteryPolicy,
    pub selection_policy: SelectionPolicy,
    /// Translation suggestion endpoint. Placeholder suggestions when unset.
    pub translation_service_url: Option<String>,
    pub translation_timeout: Duration,
    /// Image URL stored on newly unlocked cards.
    pub card_image_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                  |
    /// |----------------------------|--------------------------|
    /// | `HOST`                     | `0.0.0.0`                |
    /// | `PORT`                     | `3000`                   |
    /// | `CORS_ORIGINS`             | `*`                      |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                     |
    /// | `STATIC_DIR`               | `static`                 |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`                     |
    /// | `AUTH_MODE`                | `fixed` (or `jwt`)       |
    /// | `DEFAULT_USER_ID`          | `1`                      |
    /// | `JWT_SECRET`               | required in `jwt` mode   |
    /// | `MASTERY_POLICY`           | `revised`                |
    /// | `SELECTION_POLICY`         | `weak`                   |
    /// | `TRANSLATION_SERVICE_URL`  | unset                    |
    /// | `TRANSLATION_TIMEOUT_SECS` | `5`                      |
    /// | `CARD_IMAGE_URL`           | placeholder image        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&get, "PORT", 3000)?;
        let request_timeout_secs: u64 = parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?;
        let database_max_connections: u32 = parse_or(&get, "DATABASE_MAX_CONNECTIONS", 20)?;

        let cors_origins = parse_cors_origins(&get("CORS_ORIGINS").unwrap_or_else(|| "*".into()))?;

        let static_dir = match lookup("STATIC_DIR") {
            Some(dir) if dir.trim().is_empty() => None,
            Some(dir) => Some(dir),
            None => Some("static".to_string()),
        };

        let auth = match get("AUTH_MODE").as_deref().unwrap_or("fixed") {
            "fixed" => AuthMode::Fixed {
                user_id: parse_or(&get, "DEFAULT_USER_ID", 1)?,
            },
            "jwt" => {
                let secret = get("JWT_SECRET").ok_or(ConfigError::Missing { key: "JWT_SECRET" })?;
                AuthMode::Jwt(JwtConfig {
                    secret,
                    access_token_expiry_mins: parse_or(&get, "JWT_ACCESS_EXPIRY_MINS", 60)?,
                })
            }
            other => {
                return Err(ConfigError::Invalid {
                    key: "AUTH_MODE",
                    value: other.to_string(),
                    reason: "must be 'fixed' or 'jwt'".into(),
                })
            }
        };

        let mastery_policy = match get("MASTERY_POLICY") {
            Some(v) => MasteryPolicy::from_str_value(&v).map_err(|reason| ConfigError::Invalid {
                key: "MASTERY_POLICY",
                value: v.clone(),
                reason,
            })?,
            None => MasteryPolicy::default(),
        };

        let selection_policy = match get("SELECTION_POLICY") {
            Some(v) => {
                SelectionPolicy::from_str_value(&v).map_err(|reason| ConfigError::Invalid {
                    key: "SELECTION_POLICY",
                    value: v.clone(),
                    reason,
                })?
            }
            None => SelectionPolicy::default(),
        };

        let translation_timeout =
            Duration::from_secs(parse_or(&get, "TRANSLATION_TIMEOUT_SECS", 5)?);

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            static_dir,
            database_max_connections,
            auth,
            mastery_policy,
            selection_policy,
            translation_service_url: get("TRANSLATION_SERVICE_URL"),
            translation_timeout,
            card_image_url: get("CARD_IMAGE_URL")
                .unwrap_or_else(|| DEFAULT_CARD_IMAGE_URL.to_string()),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_cors_origins(raw: &str) -> Result<CorsOrigins, ConfigError> {
    if raw.trim() == "*" {
        return Ok(CorsOrigins::Any);
    }
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|o| {
            o.parse::<HeaderValue>().map_err(|e| ConfigError::Invalid {
                key: "CORS_ORIGINS",
                value: o.to_string(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(CorsOrigins::List)
}
