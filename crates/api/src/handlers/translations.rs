//! Handlers for translation CRUD, listing, search and tag sync.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use lingo_core::error::CoreError;
use lingo_core::search::TranslationFilter;
use lingo_core::types::DbId;
use lingo_core::validation;
use lingo_db::models::tag::{SyncTagsRequest, TagInfo};
use lingo_db::models::translation::{CreateTranslation, UpdateTranslation};
use lingo_db::repositories::{TagRepo, TranslationRepo};
use serde::Serialize;

use super::ensure_tags_exist;
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::query::{PaginationParams, SearchParams};
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Translation",
        id,
    })
}

// ---------------------------------------------------------------------------
// Listing / search
// ---------------------------------------------------------------------------

/// GET /api/v1/translations
///
/// Paginated listing of every translation, ordered by id.
pub async fn list_translations(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let pagination = params.into_pagination()?;
    let page =
        TranslationRepo::search(&state.pool, &TranslationFilter::default(), pagination).await?;

    Ok(Json(PaginatedResponse::from(page)))
}

/// GET /api/v1/translations/search
///
/// Filter by key substring, exact locale, content substring and tag ids
/// (`tag_logic=or|and`, default `or`). All given filters are AND-combined.
pub async fn search_translations(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let (filter, pagination) = params.into_filter()?;
    let page = TranslationRepo::search(&state.pool, &filter, pagination).await?;

    tracing::info!(
        user_id = auth.user_id,
        key = ?filter.key,
        locale = ?filter.locale,
        tags = filter.tags.len(),
        total = page.meta.total,
        "Translation search",
    );

    Ok(Json(PaginatedResponse::from(page)))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/translations
pub async fn create_translation(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateTranslation>,
) -> AppResult<impl IntoResponse> {
    validation::collect([
        validation::check_key(&input.key),
        validation::check_locale(&input.locale),
        validation::check_value(&input.value),
    ])?;
    ensure_tags_exist(&state.pool, &input.tags).await?;

    let input = CreateTranslation {
        key: input.key.trim().to_string(),
        locale: input.locale.trim().to_string(),
        ..input
    };
    let translation = TranslationRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        translation_id = translation.id,
        key = %translation.key,
        locale = %translation.locale,
        tags = translation.tags.len(),
        "Translation created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: translation })))
}

/// GET /api/v1/translations/{id}
pub async fn get_translation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let translation = TranslationRepo::find_view(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse { data: translation }))
}

/// PUT/PATCH /api/v1/translations/{id}
///
/// Partial update. A present `tags` list replaces the whole tag set in the
/// same transaction; an absent one leaves tags untouched.
pub async fn update_translation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTranslation>,
) -> AppResult<impl IntoResponse> {
    validation::collect([
        input.key.as_deref().and_then(validation::check_key),
        input.locale.as_deref().and_then(validation::check_locale),
        input.value.as_deref().and_then(validation::check_value),
    ])?;
    if let Some(tags) = &input.tags {
        ensure_tags_exist(&state.pool, tags).await?;
    }

    let input = UpdateTranslation {
        key: input.key.map(|k| k.trim().to_string()),
        locale: input.locale.map(|l| l.trim().to_string()),
        ..input
    };
    let translation = TranslationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        user_id = auth.user_id,
        translation_id = id,
        tags_replaced = input.tags.is_some(),
        "Translation updated",
    );

    Ok(Json(DataResponse { data: translation }))
}

/// DELETE /api/v1/translations/{id}
pub async fn delete_translation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TranslationRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(user_id = auth.user_id, translation_id = id, "Translation deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Tag sync
// ---------------------------------------------------------------------------

/// Outcome of a tag sync plus the resulting tag set.
#[derive(Debug, Serialize)]
pub struct TagSyncResponse {
    pub attached: Vec<DbId>,
    pub detached: Vec<DbId>,
    pub tags: Vec<TagInfo>,
}

/// PUT /api/v1/translations/{id}/tags
///
/// Replace the translation's tag set with exactly `tags`. Idempotent.
pub async fn sync_translation_tags(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SyncTagsRequest>,
) -> AppResult<impl IntoResponse> {
    ensure_tags_exist(&state.pool, &input.tags).await?;

    let result = TagRepo::sync_translation_tags(&state.pool, id, &input.tags)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !result.is_noop() {
        tracing::info!(
            user_id = auth.user_id,
            translation_id = id,
            attached = ?result.attached,
            detached = ?result.detached,
            "Translation tags synced",
        );
    }

    let tags = TagRepo::tags_for_translation(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: TagSyncResponse {
            attached: result.attached,
            detached: result.detached,
            tags,
        },
    }))
}
