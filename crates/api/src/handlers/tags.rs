//! Handlers for tag CRUD.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use lingo_core::error::CoreError;
use lingo_core::types::DbId;
use lingo_core::validation;
use lingo_db::models::tag::{CreateTag, UpdateTag};
use lingo_db::repositories::TagRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Tag", id })
}

/// GET /api/v1/tags
///
/// List all tags ordered by name.
pub async fn list_tags(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list(&state.pool).await?;

    Ok(Json(DataResponse { data: tags }))
}

/// POST /api/v1/tags
pub async fn create_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateTag>,
) -> AppResult<impl IntoResponse> {
    validation::collect([validation::check_tag_name(&input.name)])?;

    let tag = TagRepo::create(&state.pool, &input).await?;

    tracing::info!(user_id = auth.user_id, tag_id = tag.id, name = %tag.name, "Tag created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}

/// GET /api/v1/tags/{id}
pub async fn get_tag(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(tag_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_id(&state.pool, tag_id)
        .await?
        .ok_or_else(|| not_found(tag_id))?;

    Ok(Json(DataResponse { data: tag }))
}

/// PUT/PATCH /api/v1/tags/{id}
///
/// Rename a tag.
pub async fn update_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(tag_id): Path<DbId>,
    Json(input): Json<UpdateTag>,
) -> AppResult<impl IntoResponse> {
    validation::collect([input.name.as_deref().and_then(validation::check_tag_name)])?;

    let tag = TagRepo::update(&state.pool, tag_id, &input)
        .await?
        .ok_or_else(|| not_found(tag_id))?;

    tracing::info!(user_id = auth.user_id, tag_id, name = %tag.name, "Tag updated");

    Ok(Json(DataResponse { data: tag }))
}

/// DELETE /api/v1/tags/{id}
///
/// Delete a tag and all its translation links.
pub async fn delete_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(tag_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = TagRepo::delete(&state.pool, tag_id).await?;

    if !deleted {
        return Err(not_found(tag_id));
    }

    tracing::info!(user_id = auth.user_id, tag_id, "Tag deleted");

    Ok(StatusCode::NO_CONTENT)
}
