//! Translation search: filter composition and pagination helpers.
//!
//! A [`TranslationFilter`] is reduced to a list of [`Predicate`]s that are
//! AND-combined by the repository layer into a single query. This module
//! lives in `core` (no database dependency) so the composition rules can be
//! unit-tested without a database.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of translations per page.
pub const DEFAULT_PER_PAGE: i64 = 15;

/// Smallest accepted page size.
pub const MIN_PER_PAGE: i64 = 1;

/// Largest accepted page size.
pub const MAX_PER_PAGE: i64 = 100;

/// Escape character used in every `LIKE` pattern built by [`contains_pattern`].
pub const LIKE_ESCAPE: char = '\\';

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// AND/OR logic for the tag membership filter.
///
/// `Or` (the default) matches a translation carrying ANY of the requested
/// tags; `And` requires ALL of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagFilterLogic {
    #[default]
    Or,
    And,
}

/// The recognized, independently optional search filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationFilter {
    /// Substring matched anywhere within the key.
    pub key: Option<String>,
    /// Exact locale match.
    pub locale: Option<String>,
    /// Substring matched anywhere within the value.
    pub content: Option<String>,
    /// Tag ids; an empty list means "no tag filter".
    pub tags: Vec<DbId>,
    pub tag_logic: TagFilterLogic,
}

/// A single search condition. All predicates of a filter are AND-combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    KeyContains(String),
    LocaleEquals(String),
    ValueContains(String),
    /// Translation is linked to at least one of the (deduplicated) tag ids.
    HasAnyTag(Vec<DbId>),
    /// Translation is linked to every one of the (deduplicated) tag ids.
    HasAllTags(Vec<DbId>),
}

impl TranslationFilter {
    /// Reduce the filter to its active predicates, in a fixed order.
    ///
    /// Blank strings and an empty tag list contribute nothing, so a default
    /// filter yields an empty list (the unfiltered listing).
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::with_capacity(4);

        if let Some(key) = non_blank(self.key.as_deref()) {
            predicates.push(Predicate::KeyContains(key.to_string()));
        }
        if let Some(locale) = non_blank(self.locale.as_deref()) {
            predicates.push(Predicate::LocaleEquals(locale.to_string()));
        }
        if let Some(content) = non_blank(self.content.as_deref()) {
            predicates.push(Predicate::ValueContains(content.to_string()));
        }

        let tags = dedup_ids(&self.tags);
        if !tags.is_empty() {
            predicates.push(match self.tag_logic {
                TagFilterLogic::Or => Predicate::HasAnyTag(tags),
                TagFilterLogic::And => Predicate::HasAllTags(tags),
            });
        }

        predicates
    }

    /// `true` when no filter is active.
    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Sort and deduplicate a list of ids.
pub fn dedup_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Parse a comma-separated id list (`"3,1,7"`) as sent in query strings.
///
/// Empty segments are skipped. Returns the offending segment on a parse
/// failure.
pub fn parse_id_list(raw: &str) -> Result<Vec<DbId>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<DbId>().map_err(|_| s.to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// LIKE helpers
// ---------------------------------------------------------------------------

/// Escape `LIKE` metacharacters so user input matches literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Build a `%needle%` pattern for substring matching.
pub fn contains_pattern(needle: &str) -> String {
    format!("%{}%", escape_like(needle))
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(MIN_PER_PAGE).min(max)
}

/// A resolved page request. Always within bounds once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: clamp_limit(per_page, DEFAULT_PER_PAGE, MAX_PER_PAGE),
        }
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Length-aware pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub last_page: i64,
    /// 1-based position of the first item on the page, `None` when empty.
    pub from: Option<i64>,
    /// 1-based position of the last item on the page, `None` when empty.
    pub to: Option<i64>,
}

impl PageMeta {
    pub fn new(pagination: Pagination, total: i64, item_count: usize) -> Self {
        let per_page = pagination.per_page;
        let last_page = ((total + per_page - 1) / per_page).max(1);
        let offset = pagination.offset();
        let (from, to) = if item_count == 0 {
            (None, None)
        } else {
            (Some(offset + 1), Some(offset + item_count as i64))
        };

        Self {
            current_page: pagination.page,
            per_page,
            total,
            last_page,
            from,
            to,
        }
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
