//! Handlers for login and logout.

use axum::extract::State;
use axum::response::IntoResponse;
use lingo_core::error::{CoreError, FieldError};
use lingo_core::validation;
use lingo_db::models::user::UserInfo;
use lingo_db::repositories::{ApiTokenRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::{issue_token, normalize_email, password};
use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Login credentials. Absent fields are caught by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Reported on the `email` field so the response does not reveal whether
/// the account exists.
fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::InvalidFields(vec![FieldError::new(
        "email",
        "The provided credentials are incorrect.",
    )]))
}

/// POST /api/v1/login
///
/// Verify credentials, revoke the user's previous tokens and issue a new
/// one.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    validation::collect([
        validation::check_email(&input.email),
        validation::check_password(&input.password),
    ])?;

    let email = normalize_email(&input.email);
    let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? else {
        tracing::info!("Login failed: unknown email");
        return Err(invalid_credentials());
    };

    let valid = password::verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::info!(user_id = user.id, "Login failed: wrong password");
        return Err(invalid_credentials());
    }

    let revoked = ApiTokenRepo::revoke_all_for_user(&state.pool, user.id).await?;
    let token = issue_token(&state.pool, user.id, &state.config.jwt).await?;

    tracing::info!(user_id = user.id, revoked, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful.",
        token,
        user: UserInfo::from(user),
    }))
}

/// POST /api/v1/logout
///
/// Revoke the token that authenticated this request.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    ApiTokenRepo::revoke(&state.pool, &auth.token_id).await?;

    tracing::info!(user_id = auth.user_id, "User logged out");

    Ok(Json(MessageResponse {
        message: "Successfully logged out.",
    }))
}
