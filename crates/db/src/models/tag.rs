//! Tag and translation-tag link models and DTOs.

use lingo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Lightweight tag info embedded in translation views.
/// Avoids fetching audit columns that the caller does not need.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct TagInfo {
    pub id: DbId,
    pub name: String,
}

/// A tag joined with the translation it is linked to, used when loading
/// the tag sets of a whole page of translations in one query.
#[derive(Debug, Clone, FromRow)]
pub struct TranslationTagRow {
    pub translation_id: DbId,
    pub id: DbId,
    pub name: String,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a new tag. A missing `name` is caught by validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateTag {
    pub name: String,
}

/// DTO for updating an existing tag. Only `name` is mutable.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTag {
    pub name: Option<String>,
}

/// DTO for replacing the full tag set of a translation.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncTagsRequest {
    pub tags: Vec<DbId>,
}

/// Outcome of a tag sync: which links were added and which were removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagSyncResult {
    pub attached: Vec<DbId>,
    pub detached: Vec<DbId>,
}

impl TagSyncResult {
    /// `true` when the sync changed nothing.
    pub fn is_noop(&self) -> bool {
        self.attached.is_empty() && self.detached.is_empty()
    }
}
