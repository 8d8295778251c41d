//! Repository for the `translations` table.
//!
//! Single-record CRUD, the bulk upsert used for ingestion, and the filtered
//! search. Search renders the predicate list produced by
//! [`TranslationFilter::predicates`] into one SQL statement with
//! `sqlx::QueryBuilder`; every user value is bound, never interpolated.

use std::collections::HashMap;

use lingo_core::search::{
    contains_pattern, Page, PageMeta, Pagination, Predicate, TranslationFilter,
};
use lingo_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::translation::{
    CreateTranslation, NewTranslation, Translation, TranslationView, UpdateTranslation,
};
use crate::repositories::TagRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, key, locale, value, created_at, updated_at";

/// Same columns qualified with the `t` alias used by search queries.
const SEARCH_COLUMNS: &str = "t.id, t.key, t.locale, t.value, t.created_at, t.updated_at";

/// Rows per statement in [`TranslationRepo::upsert_many`].
const UPSERT_CHUNK_SIZE: usize = 1_000;

/// Provides CRUD and search operations for translations.
pub struct TranslationRepo;

impl TranslationRepo {
    // -----------------------------------------------------------------------
    // Create / upsert
    // -----------------------------------------------------------------------

    /// Insert a translation and attach its initial tags in one transaction.
    ///
    /// A duplicate `(key, locale)` fails with a unique violation on
    /// `uq_translations_key_locale`; nothing is written in that case.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTranslation,
    ) -> Result<TranslationView, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO translations (key, locale, value) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let translation = sqlx::query_as::<_, Translation>(&query)
            .bind(&input.key)
            .bind(&input.locale)
            .bind(&input.value)
            .fetch_one(&mut *tx)
            .await?;

        if !input.tags.is_empty() {
            TagRepo::sync_in_tx(&mut *tx, translation.id, &input.tags).await?;
        }

        tx.commit().await?;

        let tags = TagRepo::tags_for_translation(pool, translation.id).await?;
        Ok(TranslationView::new(translation, tags))
    }

    /// Insert or update a single translation keyed by `(key, locale)`.
    pub async fn upsert(pool: &PgPool, input: &NewTranslation) -> Result<Translation, sqlx::Error> {
        let query = format!(
            "INSERT INTO translations (key, locale, value) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (key, locale) DO UPDATE SET value = EXCLUDED.value \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Translation>(&query)
            .bind(&input.key)
            .bind(&input.locale)
            .bind(&input.value)
            .fetch_one(pool)
            .await
    }

    /// Bulk insert-or-update keyed by `(key, locale)`, inside one transaction.
    ///
    /// Safe to run repeatedly or concurrently with other writers: the
    /// uniqueness constraint arbitrates, never an application pre-check.
    /// Duplicate pairs within `rows` collapse to the last occurrence.
    /// Returns the number of rows inserted or updated.
    pub async fn upsert_many(pool: &PgPool, rows: &[NewTranslation]) -> Result<u64, sqlx::Error> {
        let rows = last_per_natural_key(rows);
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = pool.begin().await?;
        let mut affected = 0;

        for chunk in rows.chunks(UPSERT_CHUNK_SIZE) {
            let keys: Vec<&str> = chunk.iter().map(|r| r.key.as_str()).collect();
            let locales: Vec<&str> = chunk.iter().map(|r| r.locale.as_str()).collect();
            let values: Vec<&str> = chunk.iter().map(|r| r.value.as_str()).collect();

            let result = sqlx::query(
                "INSERT INTO translations (key, locale, value) \
                 SELECT * FROM UNNEST($1::VARCHAR[], $2::VARCHAR[], $3::TEXT[]) \
                 ON CONFLICT (key, locale) DO UPDATE SET value = EXCLUDED.value",
            )
            .bind(&keys)
            .bind(&locales)
            .bind(&values)
            .execute(&mut *tx)
            .await?;

            affected += result.rows_affected();
        }

        tx.commit().await?;
        Ok(affected)
    }

    // -----------------------------------------------------------------------
    // Read
    // -----------------------------------------------------------------------

    /// Find a translation row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Translation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM translations WHERE id = $1");
        sqlx::query_as::<_, Translation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a translation by ID together with its tags.
    pub async fn find_view(pool: &PgPool, id: DbId) -> Result<Option<TranslationView>, sqlx::Error> {
        let Some(translation) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let tags = TagRepo::tags_for_translation(pool, id).await?;
        Ok(Some(TranslationView::new(translation, tags)))
    }

    // -----------------------------------------------------------------------
    // Update / delete
    // -----------------------------------------------------------------------

    /// Update a translation. Only non-`None` fields in `input` are applied.
    ///
    /// When `input.tags` is present the tag set is replaced in the same
    /// transaction as the field update. Returns `None` if no row with the
    /// given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTranslation,
    ) -> Result<Option<TranslationView>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE translations SET \
                key = COALESCE($2, key), \
                locale = COALESCE($3, locale), \
                value = COALESCE($4, value) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Translation>(&query)
            .bind(id)
            .bind(&input.key)
            .bind(&input.locale)
            .bind(&input.value)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(translation) = updated else {
            return Ok(None);
        };

        if let Some(tag_ids) = &input.tags {
            TagRepo::sync_in_tx(&mut *tx, id, tag_ids).await?;
        }

        tx.commit().await?;

        let tags = TagRepo::tags_for_translation(pool, id).await?;
        Ok(Some(TranslationView::new(translation, tags)))
    }

    /// Delete a translation by ID. Its tag links go with it (FK cascade).
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM translations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Count translations matching `filter`.
    pub async fn count(pool: &PgPool, filter: &TranslationFilter) -> Result<i64, sqlx::Error> {
        let predicates = filter.predicates();
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM translations t");
        push_predicates(&mut query, &predicates);
        query.build_query_scalar::<i64>().fetch_one(pool).await
    }

    /// Return one page of translations matching `filter`, with tag sets and
    /// the total match count.
    ///
    /// Results are ordered by `id`, so repeated calls over unchanged data
    /// return identical pages. An empty filter lists everything.
    pub async fn search(
        pool: &PgPool,
        filter: &TranslationFilter,
        pagination: Pagination,
    ) -> Result<Page<TranslationView>, sqlx::Error> {
        let total = Self::count(pool, filter).await?;
        let predicates = filter.predicates();

        let offset = pagination.offset();
        let rows = if total == 0 || offset >= total {
            Vec::new()
        } else {
            let mut page_query =
                QueryBuilder::<Postgres>::new(format!("SELECT {SEARCH_COLUMNS} FROM translations t"));
            push_predicates(&mut page_query, &predicates);
            page_query
                .push(" ORDER BY t.id LIMIT ")
                .push_bind(pagination.per_page)
                .push(" OFFSET ")
                .push_bind(offset);
            page_query
                .build_query_as::<Translation>()
                .fetch_all(pool)
                .await?
        };

        let ids: Vec<DbId> = rows.iter().map(|t| t.id).collect();
        let mut tags = TagRepo::tags_for_translations(pool, &ids).await?;

        let items: Vec<TranslationView> = rows
            .into_iter()
            .map(|t| {
                let tag_set = tags.remove(&t.id).unwrap_or_default();
                TranslationView::new(t, tag_set)
            })
            .collect();

        tracing::debug!(
            predicates = predicates.len(),
            total,
            returned = items.len(),
            page = pagination.page,
            "Translation search executed",
        );

        Ok(Page {
            meta: PageMeta::new(pagination, total, items.len()),
            items,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Append the AND-combined `WHERE` clause for `predicates` to `query`.
///
/// Expects the `translations` table to be aliased as `t`.
fn push_predicates(query: &mut QueryBuilder<'_, Postgres>, predicates: &[Predicate]) {
    for (i, predicate) in predicates.iter().enumerate() {
        query.push(if i == 0 { " WHERE " } else { " AND " });

        match predicate {
            Predicate::KeyContains(needle) => {
                query
                    .push("t.key LIKE ")
                    .push_bind(contains_pattern(needle))
                    .push(" ESCAPE '\\'");
            }
            Predicate::LocaleEquals(locale) => {
                query.push("t.locale = ").push_bind(locale.clone());
            }
            Predicate::ValueContains(needle) => {
                query
                    .push("t.value LIKE ")
                    .push_bind(contains_pattern(needle))
                    .push(" ESCAPE '\\'");
            }
            Predicate::HasAnyTag(tag_ids) => {
                query
                    .push(
                        "EXISTS (SELECT 1 FROM tag_translation tt \
                         WHERE tt.translation_id = t.id AND tt.tag_id = ANY(",
                    )
                    .push_bind(tag_ids.clone())
                    .push("))");
            }
            Predicate::HasAllTags(tag_ids) => {
                // Links are unique per (translation, tag), so the count of
                // matching links equals the number of distinct matched tags.
                query
                    .push(
                        "(SELECT COUNT(*) FROM tag_translation tt \
                         WHERE tt.translation_id = t.id AND tt.tag_id = ANY(",
                    )
                    .push_bind(tag_ids.clone())
                    .push(")) = ")
                    .push_bind(tag_ids.len() as i64);
            }
        }
    }
}

/// Collapse rows sharing a `(key, locale)` pair to the last occurrence,
/// keeping first-seen order. A single `ON CONFLICT DO UPDATE` statement
/// cannot touch the same row twice.
fn last_per_natural_key(rows: &[NewTranslation]) -> Vec<&NewTranslation> {
    let mut slots: HashMap<(&str, &str), usize> = HashMap::with_capacity(rows.len());
    let mut unique: Vec<&NewTranslation> = Vec::with_capacity(rows.len());

    for row in rows {
        match slots.get(&(row.key.as_str(), row.locale.as_str())).copied() {
            Some(idx) => unique[idx] = row,
            None => {
                slots.insert((row.key.as_str(), row.locale.as_str()), unique.len());
                unique.push(row);
            }
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new(key: &str, locale: &str, value: &str) -> NewTranslation {
        NewTranslation {
            key: key.into(),
            locale: locale.into(),
            value: value.into(),
        }
    }

    #[test]
    fn duplicate_natural_keys_collapse_to_last() {
        let rows = vec![
            new("a", "en", "first"),
            new("b", "en", "B"),
            new("a", "en", "second"),
            new("a", "fr", "A-fr"),
        ];
        let unique = last_per_natural_key(&rows);
        let values: Vec<&str> = unique.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, ["second", "B", "A-fr"]);
    }

    #[test]
    fn no_predicates_renders_no_where_clause() {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM translations t");
        push_predicates(&mut query, &[]);
        assert_eq!(query.sql(), "SELECT COUNT(*) FROM translations t");
    }

    #[test]
    fn predicates_are_and_combined_with_placeholders() {
        let filter = TranslationFilter {
            key: Some("common".into()),
            locale: Some("en".into()),
            tags: vec![1, 2],
            ..Default::default()
        };
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM translations t");
        push_predicates(&mut query, &filter.predicates());

        assert_eq!(
            query.sql(),
            "SELECT COUNT(*) FROM translations t \
             WHERE t.key LIKE $1 ESCAPE '\\' \
             AND t.locale = $2 \
             AND EXISTS (SELECT 1 FROM tag_translation tt \
             WHERE tt.translation_id = t.id AND tt.tag_id = ANY($3))"
        );
    }

    #[test]
    fn all_tags_mode_compares_link_count() {
        let filter = TranslationFilter {
            tags: vec![4, 9],
            tag_logic: lingo_core::search::TagFilterLogic::And,
            ..Default::default()
        };
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM translations t");
        push_predicates(&mut query, &filter.predicates());

        assert!(query.sql().ends_with("tt.tag_id = ANY($1)) = $2"));
    }
}
