pub mod auth;
pub mod export;
pub mod tags;
pub mod translations;

use lingo_core::error::{CoreError, FieldError};
use lingo_core::types::DbId;
use lingo_db::repositories::TagRepo;
use sqlx::PgPool;

use crate::error::AppResult;

/// Reject a request that references tag ids which do not exist.
///
/// Runs before any write so a bad id surfaces as a field error instead of
/// a foreign-key failure.
pub(crate) async fn ensure_tags_exist(pool: &PgPool, tag_ids: &[DbId]) -> AppResult<()> {
    let missing = TagRepo::missing_ids(pool, tag_ids).await?;
    if missing.is_empty() {
        return Ok(());
    }

    tracing::debug!(?missing, "Rejected unknown tag ids");
    Err(CoreError::InvalidFields(vec![FieldError::new(
        "tags",
        "One or more selected tags do not exist.",
    )])
    .into())
}
