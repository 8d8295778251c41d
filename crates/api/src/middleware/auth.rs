//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use lingo_core::error::CoreError;
use lingo_core::types::DbId;
use lingo_db::repositories::ApiTokenRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller behind a valid, unrevoked bearer token.
///
/// Taking this as a handler argument makes the route require authentication:
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> AppResult<impl IntoResponse> {
///     tracing::info!(user_id = auth.user_id, "handling request");
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// From `claims.sub`.
    pub user_id: DbId,
    /// The token's `jti`; logout revokes exactly this token.
    pub token_id: String,
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Unauthenticated."))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token."))?;

        let stored = ApiTokenRepo::touch_active(&state.pool, &claims.jti)
            .await?
            .filter(|t| t.user_id == claims.sub)
            .ok_or_else(|| unauthorized("Token has been revoked."))?;

        Ok(AuthUser {
            user_id: stored.user_id,
            token_id: stored.jti,
        })
    }
}
