//! Shared helpers for HTTP integration tests.
//!
//! Requests go straight to the router through `tower::ServiceExt::oneshot`,
//! no TCP listener involved.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use lingo_db::models::user::CreateUser;
use lingo_db::repositories::UserRepo;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::set_header::SetRequestHeaderLayer;

use lingo_api::auth::issue_token;
use lingo_api::auth::jwt::JwtConfig;
use lingo_api::config::{LogFormat, ServerConfig};
use lingo_api::router::build_app_router;
use lingo_api::state::AppState;

/// Account every authenticated test request acts as.
pub const TEST_USER_EMAIL: &str = "tester@example.com";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: String::new(),
        database_max_connections: 5,
        log_format: LogFormat::Pretty,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            token_expiry_mins: 60,
        },
        bootstrap_user: None,
    }
}

/// Build the full application router (same middleware stack as production)
/// around the given pool, without credentials.
pub fn build_anonymous_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Like [`build_anonymous_app`], but every request carries a valid bearer
/// token for [`TEST_USER_EMAIL`].
pub async fn build_test_app(pool: PgPool) -> Router {
    let token = test_token(&pool).await;
    let value = HeaderValue::from_str(&format!("Bearer {token}")).unwrap();
    build_anonymous_app(pool).layer(SetRequestHeaderLayer::overriding(AUTHORIZATION, value))
}

/// Issue a fresh token for the test user, creating the user on first use.
///
/// The stored hash is not a valid PHC string, so this user cannot log in
/// with a password; login tests create their own users.
pub async fn test_token(pool: &PgPool) -> String {
    let user = UserRepo::create_if_absent(
        pool,
        &CreateUser {
            name: "Tester".to_string(),
            email: TEST_USER_EMAIL.to_string(),
            password_hash: "!".to_string(),
        },
    )
    .await
    .unwrap();
    let user_id = match user {
        Some(user) => user.id,
        None => {
            UserRepo::find_by_email(pool, TEST_USER_EMAIL)
                .await
                .unwrap()
                .unwrap()
                .id
        }
    };
    issue_token(pool, user_id, &test_config().jwt).await.unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a tag through the API and return its id.
pub async fn create_tag(pool: &PgPool, name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()).await,
        "/api/v1/tags",
        serde_json::json!({ "name": name }),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a translation through the API and return the `data` object.
pub async fn create_translation(
    pool: &PgPool,
    key: &str,
    locale: &str,
    value: &str,
    tags: &[i64],
) -> serde_json::Value {
    let response = post_json(
        build_test_app(pool.clone()).await,
        "/api/v1/translations",
        serde_json::json!({ "key": key, "locale": locale, "value": value, "tags": tags }),
    )
    .await;
    body_json(response).await["data"].clone()
}
