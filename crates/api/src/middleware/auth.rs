//! Current-user extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vocab_core::error::CoreError;
use vocab_core::types::DbId;
use vocab_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::config::AuthMode;
use crate::error::AppError;
use crate::state::AppState;

/// The user a request acts on behalf of, resolved according to the
/// configured [`AuthMode`].
///
/// ```ignore
/// async fn my_handler(CurrentUser { user_id }: CurrentUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jwt = match &state.config.auth {
            AuthMode::Fixed { user_id } => return Ok(CurrentUser { user_id: *user_id }),
            AuthMode::Jwt(jwt) => jwt,
        };

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, jwt).map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        // Tokens may outlive the account they were issued for.
        if UserRepo::find_by_id(&state.pool, claims.sub).await?.is_none() {
            tracing::warn!(user_id = claims.sub, jti = %claims.jti, "Token for unknown user");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Unknown user".into(),
            )));
        }

        tracing::debug!(user_id = claims.sub, jti = %claims.jti, "Bearer token accepted");

        Ok(CurrentUser {
            user_id: claims.sub,
        })
    }
}
