//! Authentication primitives and token issuance.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- bearer token signing and validation.

pub mod jwt;
pub mod password;

use lingo_core::types::DbId;
use lingo_core::validation;
use lingo_db::models::user::CreateUser;
use lingo_db::repositories::{ApiTokenRepo, UserRepo};
use sqlx::PgPool;

use self::jwt::JwtConfig;
use crate::error::{AppError, AppResult};

/// Sign a token for `user_id` and record its `jti` so it can be revoked.
pub async fn issue_token(pool: &PgPool, user_id: DbId, config: &JwtConfig) -> AppResult<String> {
    let issued = jwt::generate_token(user_id, config)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    ApiTokenRepo::create(pool, user_id, &issued.jti, issued.expires_at).await?;
    Ok(issued.token)
}

/// Emails are stored and looked up lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Account ensured at startup, for deployments without any other way to
/// create users.
#[derive(Debug, Clone)]
pub struct BootstrapUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl BootstrapUser {
    /// Load from the environment; `None` when `BOOTSTRAP_USER_EMAIL` is unset.
    ///
    /// | Env Var                   | Required   | Default |
    /// |---------------------------|------------|---------|
    /// | `BOOTSTRAP_USER_EMAIL`    | no         | --      |
    /// | `BOOTSTRAP_USER_PASSWORD` | with email | --      |
    /// | `BOOTSTRAP_USER_NAME`     | no         | `Admin` |
    ///
    /// # Panics
    ///
    /// Panics if the email is malformed or the password is missing.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("BOOTSTRAP_USER_EMAIL").ok()?;
        if let Some(err) = validation::check_email(&email) {
            panic!("BOOTSTRAP_USER_EMAIL is invalid: {}", err.message);
        }

        let password = std::env::var("BOOTSTRAP_USER_PASSWORD")
            .expect("BOOTSTRAP_USER_PASSWORD must be set when BOOTSTRAP_USER_EMAIL is");
        assert!(!password.is_empty(), "BOOTSTRAP_USER_PASSWORD must not be empty");

        let name = std::env::var("BOOTSTRAP_USER_NAME").unwrap_or_else(|_| "Admin".into());

        Some(Self {
            name,
            email: normalize_email(&email),
            password,
        })
    }
}

/// Create the bootstrap account unless its email is already registered.
///
/// An existing account keeps its password. Returns `true` if a user was
/// created.
pub async fn ensure_bootstrap_user(pool: &PgPool, user: &BootstrapUser) -> AppResult<bool> {
    let email = normalize_email(&user.email);
    if UserRepo::find_by_email(pool, &email).await?.is_some() {
        return Ok(false);
    }

    let password_hash = password::hash_password(&user.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let created = UserRepo::create_if_absent(
        pool,
        &CreateUser {
            name: user.name.clone(),
            email,
            password_hash,
        },
    )
    .await?;

    Ok(created.is_some())
}
