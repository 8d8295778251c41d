use axum::routing::{get, put};
use axum::Router;

use crate::handlers::translations;
use crate::state::AppState;

/// Translation routes mounted at `/translations`.
///
/// ```text
/// GET    /              -> list_translations
/// POST   /              -> create_translation
/// GET    /search        -> search_translations
/// GET    /{id}          -> get_translation
/// PUT    /{id}          -> update_translation
/// PATCH  /{id}          -> update_translation
/// DELETE /{id}          -> delete_translation
/// PUT    /{id}/tags     -> sync_translation_tags
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(translations::list_translations).post(translations::create_translation),
        )
        .route("/search", get(translations::search_translations))
        .route(
            "/{id}",
            get(translations::get_translation)
                .put(translations::update_translation)
                .patch(translations::update_translation)
                .delete(translations::delete_translation),
        )
        .route("/{id}/tags", put(translations::sync_translation_tags))
}
