//! Translation entity model, views and DTOs.

use lingo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::tag::TagInfo;

/// A row from the `translations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Translation {
    pub id: DbId,
    pub key: String,
    pub locale: String,
    pub value: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A translation together with its tag set, as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationView {
    pub id: DbId,
    pub key: String,
    pub locale: String,
    pub value: String,
    pub tags: Vec<TagInfo>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TranslationView {
    pub fn new(translation: Translation, tags: Vec<TagInfo>) -> Self {
        Self {
            id: translation.id,
            key: translation.key,
            locale: translation.locale,
            value: translation.value,
            tags,
            created_at: translation.created_at,
            updated_at: translation.updated_at,
        }
    }
}

/// The projection read by the export path: no timestamps, no tags.
#[derive(Debug, Clone, FromRow)]
pub struct ExportRow {
    pub id: DbId,
    pub locale: String,
    pub key: String,
    pub value: String,
}

/// DTO for creating a translation, optionally with an initial tag set.
///
/// Absent fields deserialize as empty so that request validation, not the
/// JSON decoder, reports which required fields are missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateTranslation {
    pub key: String,
    pub locale: String,
    pub value: String,
    pub tags: Vec<DbId>,
}

/// DTO for updating a translation. All fields are optional.
///
/// `tags: None` leaves the tag set untouched; `Some(vec![])` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTranslation {
    pub key: Option<String>,
    pub locale: Option<String>,
    pub value: Option<String>,
    pub tags: Option<Vec<DbId>>,
}

/// A bare `(key, locale, value)` triple for bulk ingestion.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTranslation {
    pub key: String,
    pub locale: String,
    pub value: String,
}
