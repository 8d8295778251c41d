pub mod auth;
pub mod export;
pub mod health;
pub mod tags;
pub mod translations;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route except `/login` requires a bearer token; handlers enforce it
/// by taking an `AuthUser` argument.
///
/// ```text
/// /login                               issue token (public)
/// /logout                              revoke current token
///
/// /translations                        list, create
/// /translations/search                 filtered search
/// /translations/{id}                   get, update, delete
/// /translations/{id}/tags              sync tag set (PUT)
///
/// /tags                                list, create
/// /tags/{id}                           get, rename, delete
///
/// /export                              grouped export (?locale=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/translations", translations::router())
        .nest("/tags", tags::router())
        .merge(auth::router())
        .merge(export::router())
}
