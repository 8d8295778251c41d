//! Handler for the grouped translation export.

use axum::extract::State;
use axum::response::IntoResponse;
use lingo_core::export::Export;
use lingo_db::repositories::ExportRepo;

use crate::error::AppResult;
use crate::extract::{Json, Query};
use crate::middleware::auth::AuthUser;
use crate::query::ExportParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/export
///
/// Without `locale`: `{ "data": { locale: { key: value } } }`.
/// With `locale`: `{ "data": { key: value } }`. Empty store or unknown
/// locale yields `{ "data": {} }`.
pub async fn export_translations(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ExportParams>,
) -> AppResult<impl IntoResponse> {
    let export = ExportRepo::export(&state.pool, params.locale()).await?;

    let entries = match &export {
        Export::All(map) => map.values().map(|keys| keys.len()).sum::<usize>(),
        Export::Locale(map) => map.len(),
    };
    tracing::info!(
        user_id = auth.user_id,
        locale = ?params.locale(),
        entries,
        "Translations exported",
    );

    Ok(Json(DataResponse { data: export }))
}
