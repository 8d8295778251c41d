//! Bearer token signing and validation.
//!
//! Tokens are HS256-signed JWTs. Each carries a random `jti` that is also
//! stored in `api_tokens`; a token is only accepted while that row exists,
//! which is what makes logout effective before `exp`.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lingo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's database id.
    pub sub: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Token id, the revocation handle.
    pub jti: String,
}

/// Configuration for token signing and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret.
    pub secret: String,
    /// Token lifetime in minutes.
    pub token_expiry_mins: i64,
}

/// Default token lifetime: one day.
const DEFAULT_TOKEN_EXPIRY_MINS: i64 = 24 * 60;

impl JwtConfig {
    /// Load from the environment.
    ///
    /// | Env Var                | Required | Default |
    /// |------------------------|----------|---------|
    /// | `JWT_SECRET`           | **yes**  | --      |
    /// | `JWT_EXPIRY_MINS`      | no       | `1440`  |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is unset or empty, or the expiry is not a
    /// positive integer.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let token_expiry_mins: i64 = std::env::var("JWT_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_EXPIRY_MINS must be a valid i64");
        assert!(token_expiry_mins > 0, "JWT_EXPIRY_MINS must be positive");

        Self {
            secret,
            token_expiry_mins,
        }
    }
}

/// A freshly signed token and the facts needed to record it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub expires_at: Timestamp,
}

/// Sign a token for `user_id` with a new random `jti`.
pub fn generate_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::minutes(config.token_expiry_mins);
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp(),
        iat: issued_at.timestamp(),
        jti: jti.clone(),
    };
    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(IssuedToken {
        token,
        jti,
        expires_at,
    })
}

/// Check signature and expiry and return the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            token_expiry_mins: 60,
        }
    }

    #[test]
    fn generated_token_validates() {
        let config = test_config();
        let issued = generate_token(42, &config).unwrap();

        let claims = validate_token(&issued.token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn each_token_gets_its_own_jti() {
        let config = test_config();
        let a = generate_token(1, &config).unwrap();
        let b = generate_token(1, &config).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config();

        // Well past the default 60-second leeway.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_fails() {
        let issued = generate_token(1, &test_config()).unwrap();
        let other = JwtConfig {
            secret: "a-completely-different-secret-value".to_string(),
            ..test_config()
        };
        assert!(validate_token(&issued.token, &other).is_err());
    }
}
