//! Repository for the `tags` and `tag_translation` tables.
//!
//! Provides tag CRUD, batch loading of translation tag sets, existence
//! checks for tag ids, and the atomic tag-set sync for a translation.

use std::collections::HashMap;

use lingo_core::search::dedup_ids;
use lingo_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::tag::{CreateTag, Tag, TagInfo, TagSyncResult, TranslationTagRow, UpdateTag};

/// Column list for `tags` queries.
const TAG_COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for tags and translation-tag associations.
pub struct TagRepo;

impl TagRepo {
    // -----------------------------------------------------------------------
    // Tag CRUD
    // -----------------------------------------------------------------------

    /// Insert a new tag. Fails with a unique violation on `uq_tags_name`
    /// if the name is taken.
    pub async fn create(pool: &PgPool, input: &CreateTag) -> Result<Tag, sqlx::Error> {
        let query = format!("INSERT INTO tags (name) VALUES ($1) RETURNING {TAG_COLUMNS}");
        sqlx::query_as::<_, Tag>(&query)
            .bind(input.name.trim())
            .fetch_one(pool)
            .await
    }

    /// Create a tag or return the existing one with the same name.
    ///
    /// Uses `ON CONFLICT DO NOTHING` so concurrent callers never fail; the
    /// loser of the race reads the winner's row.
    pub async fn create_or_get(pool: &PgPool, name: &str) -> Result<Tag, sqlx::Error> {
        let name = name.trim();
        let query = format!(
            "INSERT INTO tags (name) VALUES ($1) \
             ON CONFLICT (name) DO NOTHING \
             RETURNING {TAG_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(tag) => Ok(tag),
            None => Self::find_by_name(pool, name)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// Find a tag by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a tag by its exact name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE name = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all tags ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags ORDER BY name, id");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    /// Rename a tag. A `None` name leaves the row unchanged.
    ///
    /// Returns `None` if no tag with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTag,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!(
            "UPDATE tags SET name = COALESCE($2, name) \
             WHERE id = $1 \
             RETURNING {TAG_COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .fetch_optional(pool)
            .await
    }

    /// Delete a tag by ID. Cascade deletes all its translation links.
    ///
    /// Returns `true` if a tag was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Return the subset of `ids` that do not correspond to any tag, sorted.
    pub async fn missing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        let ids = dedup_ids(ids);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_scalar::<_, DbId>(
            "SELECT requested.id \
             FROM UNNEST($1::BIGINT[]) AS requested(id) \
             WHERE NOT EXISTS (SELECT 1 FROM tags t WHERE t.id = requested.id) \
             ORDER BY requested.id",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Translation-tag associations
    // -----------------------------------------------------------------------

    /// List the tags linked to one translation, ordered by name.
    pub async fn tags_for_translation(
        pool: &PgPool,
        translation_id: DbId,
    ) -> Result<Vec<TagInfo>, sqlx::Error> {
        sqlx::query_as::<_, TagInfo>(
            "SELECT t.id, t.name \
             FROM tag_translation tt \
             JOIN tags t ON t.id = tt.tag_id \
             WHERE tt.translation_id = $1 \
             ORDER BY t.name, t.id",
        )
        .bind(translation_id)
        .fetch_all(pool)
        .await
    }

    /// Load the tag sets of many translations in one query.
    ///
    /// Translations without tags are absent from the returned map.
    pub async fn tags_for_translations(
        pool: &PgPool,
        translation_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<TagInfo>>, sqlx::Error> {
        if translation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, TranslationTagRow>(
            "SELECT tt.translation_id, t.id, t.name \
             FROM tag_translation tt \
             JOIN tags t ON t.id = tt.tag_id \
             WHERE tt.translation_id = ANY($1) \
             ORDER BY t.name, t.id",
        )
        .bind(translation_ids)
        .fetch_all(pool)
        .await?;

        let mut by_translation: HashMap<DbId, Vec<TagInfo>> = HashMap::new();
        for row in rows {
            by_translation
                .entry(row.translation_id)
                .or_default()
                .push(TagInfo {
                    id: row.id,
                    name: row.name,
                });
        }
        Ok(by_translation)
    }

    /// Replace the full tag set of a translation in its own transaction.
    ///
    /// Returns `None` (and writes nothing) if the translation does not exist.
    pub async fn sync_translation_tags(
        pool: &PgPool,
        translation_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<Option<TagSyncResult>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = Self::sync_in_tx(&mut *tx, translation_id, tag_ids).await?;
        if result.is_some() {
            tx.commit().await?;
        }
        Ok(result)
    }

    /// Sync step usable inside a caller's transaction.
    ///
    /// Locks the translation row first so concurrent syncs of the same
    /// translation serialize; syncs of different translations do not
    /// contend. Links in the intersection are left untouched.
    pub async fn sync_in_tx(
        conn: &mut PgConnection,
        translation_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<Option<TagSyncResult>, sqlx::Error> {
        let locked = sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM translations WHERE id = $1 FOR UPDATE",
        )
        .bind(translation_id)
        .fetch_optional(&mut *conn)
        .await?;

        if locked.is_none() {
            return Ok(None);
        }

        let desired = dedup_ids(tag_ids);

        let mut detached = sqlx::query_scalar::<_, DbId>(
            "DELETE FROM tag_translation \
             WHERE translation_id = $1 AND NOT (tag_id = ANY($2)) \
             RETURNING tag_id",
        )
        .bind(translation_id)
        .bind(&desired)
        .fetch_all(&mut *conn)
        .await?;

        let mut attached = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO tag_translation (translation_id, tag_id) \
             SELECT $1, UNNEST($2::BIGINT[]) \
             ON CONFLICT (translation_id, tag_id) DO NOTHING \
             RETURNING tag_id",
        )
        .bind(translation_id)
        .bind(&desired)
        .fetch_all(&mut *conn)
        .await?;

        attached.sort_unstable();
        detached.sort_unstable();

        Ok(Some(TagSyncResult { attached, detached }))
    }
}
