//! Read path for the translation export.
//!
//! Fetches only `(id, locale, key, value)`, ordered by locale then key,
//! and streams rows straight into the aggregator. No tags, no timestamps,
//! and no per-locale sub-queries: one statement, one linear pass.

use std::time::Instant;

use futures::TryStreamExt;
use lingo_core::export::{Export, ExportAggregator, ExportMap, LocaleMap};
use sqlx::PgPool;

use crate::models::translation::ExportRow;

/// Provides the grouped translation export.
pub struct ExportRepo;

impl ExportRepo {
    /// Export every translation as `locale -> key -> value`.
    ///
    /// An empty store yields an empty map.
    pub async fn export_all(pool: &PgPool) -> Result<ExportMap, sqlx::Error> {
        let started = Instant::now();

        let mut rows = sqlx::query_as::<_, ExportRow>(
            "SELECT id, locale, key, value FROM translations ORDER BY locale, key",
        )
        .fetch(pool);

        let mut aggregator = ExportAggregator::new();
        while let Some(row) = rows.try_next().await? {
            aggregator.push(row.locale, row.key, row.value);
        }

        tracing::debug!(
            rows = aggregator.rows(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Exported all locales",
        );

        Ok(aggregator.finish())
    }

    /// Export a single locale as a flat `key -> value` map.
    ///
    /// An unknown locale yields an empty map.
    pub async fn export_locale(pool: &PgPool, locale: &str) -> Result<LocaleMap, sqlx::Error> {
        let started = Instant::now();

        let map: LocaleMap = sqlx::query_as::<_, ExportRow>(
            "SELECT id, locale, key, value FROM translations \
             WHERE locale = $1 \
             ORDER BY key",
        )
        .bind(locale)
        .fetch(pool)
        .map_ok(|row| (row.key, row.value))
        .try_collect()
        .await?;

        tracing::debug!(
            locale,
            rows = map.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Exported locale",
        );

        Ok(map)
    }

    /// Export everything, or just `locale` when given.
    pub async fn export(pool: &PgPool, locale: Option<&str>) -> Result<Export, sqlx::Error> {
        match locale {
            Some(locale) => Self::export_locale(pool, locale).await.map(Export::Locale),
            None => Self::export_all(pool).await.map(Export::All),
        }
    }
}
