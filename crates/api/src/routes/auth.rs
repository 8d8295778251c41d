use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Session routes, merged at the `/api/v1` root.
///
/// ```text
/// POST /login    -> login    (public)
/// POST /logout   -> logout   (bearer token)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}
