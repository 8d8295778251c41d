//! Repository for the `api_tokens` table.
//!
//! Tokens are identified by the `jti` claim of the bearer JWT. Revoking a
//! token deletes its row, which makes the JWT unusable even before it expires.

use lingo_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::ApiToken;

const COLUMNS: &str = "id, user_id, jti, expires_at, last_used_at, created_at";

pub struct ApiTokenRepo;

impl ApiTokenRepo {
    /// Record a newly issued token.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        jti: &str,
        expires_at: Timestamp,
    ) -> Result<ApiToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO api_tokens (user_id, jti, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApiToken>(&query)
            .bind(user_id)
            .bind(jti)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Look up an unexpired token and stamp `last_used_at` in the same statement.
    pub async fn touch_active(pool: &PgPool, jti: &str) -> Result<Option<ApiToken>, sqlx::Error> {
        let query = format!(
            "UPDATE api_tokens SET last_used_at = NOW()
             WHERE jti = $1 AND expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApiToken>(&query)
            .bind(jti)
            .fetch_optional(pool)
            .await
    }

    /// Revoke one token. Returns `true` if it existed.
    pub async fn revoke(pool: &PgPool, jti: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM api_tokens WHERE jti = $1")
            .bind(jti)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every token of a user. Returns the number revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM api_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
