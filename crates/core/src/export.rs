//! Export aggregation: flat `(locale, key, value)` rows to a grouped mapping.
//!
//! Grouping is a single linear pass. Rows are expected in `(locale, key)`
//! order (the repository sorts them), so consecutive rows usually share a
//! locale; the aggregator remembers the slot of the last locale it touched
//! and only hashes the locale string when it changes. Unsorted input is
//! still grouped correctly.
//!
//! Maps preserve insertion order, so the serialized JSON follows the query
//! order and stays stable between runs over unchanged data.

use indexmap::IndexMap;
use serde::Serialize;

/// `key -> value` for one locale.
pub type LocaleMap = IndexMap<String, String>;

/// `locale -> (key -> value)` for the whole store.
pub type ExportMap = IndexMap<String, LocaleMap>;

/// Result of an export request: nested for all locales, flat for one.
///
/// Serializes as the bare map in both cases.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Export {
    All(ExportMap),
    Locale(LocaleMap),
}

/// Folds rows into an [`ExportMap`].
#[derive(Debug, Default)]
pub struct ExportAggregator {
    groups: ExportMap,
    /// Index into `groups` of the locale seen on the previous row.
    current: Option<usize>,
    rows: usize,
}

impl ExportAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one row. A repeated `(locale, key)` overwrites the earlier value.
    pub fn push(&mut self, locale: String, key: String, value: String) {
        self.rows += 1;

        let slot = match self.current {
            Some(idx) if self.groups.get_index(idx).is_some_and(|(l, _)| *l == locale) => idx,
            _ => {
                let entry = self.groups.entry(locale);
                let idx = entry.index();
                entry.or_default();
                self.current = Some(idx);
                idx
            }
        };

        if let Some((_, keys)) = self.groups.get_index_mut(slot) {
            keys.insert(key, value);
        }
    }

    /// Number of rows pushed so far (including overwritten duplicates).
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(self) -> ExportMap {
        self.groups
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn row(locale: &str, key: &str, value: &str) -> (String, String, String) {
        (locale.into(), key.into(), value.into())
    }

    fn aggregate(rows: Vec<(String, String, String)>) -> ExportMap {
        let mut aggregator = ExportAggregator::new();
        for (locale, key, value) in rows {
            aggregator.push(locale, key, value);
        }
        aggregator.finish()
    }

    #[test]
    fn empty_input_yields_empty_map() {
        let map = aggregate(Vec::new());
        assert!(map.is_empty());
        assert_eq!(serde_json::to_string(&map).unwrap(), "{}");
    }

    #[test]
    fn groups_rows_by_locale_then_key() {
        let map = aggregate(vec![
            row("en", "common.goodbye", "Goodbye"),
            row("en", "common.welcome", "Welcome"),
            row("fr", "common.welcome", "Bienvenue"),
        ]);

        let expected = serde_json::json!({
            "en": {"common.welcome": "Welcome", "common.goodbye": "Goodbye"},
            "fr": {"common.welcome": "Bienvenue"},
        });
        assert_eq!(serde_json::to_value(&map).unwrap(), expected);
    }

    #[test]
    fn preserves_input_order() {
        let map = aggregate(vec![
            row("de", "a", "1"),
            row("en", "b", "2"),
            row("en", "c", "3"),
        ]);
        let locales: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(locales, ["de", "en"]);
        let keys: Vec<&str> = map["en"].keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "c"]);
    }

    #[test]
    fn unsorted_input_is_still_grouped() {
        let map = aggregate(vec![
            row("en", "a", "A"),
            row("fr", "a", "A-fr"),
            row("en", "b", "B"),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["en"].len(), 2);
        assert_eq!(map["en"]["b"], "B");
    }

    #[test]
    fn duplicate_locale_key_last_seen_wins() {
        let mut agg = ExportAggregator::new();
        agg.push("en".into(), "k".into(), "first".into());
        agg.push("en".into(), "k".into(), "second".into());
        assert_eq!(agg.rows(), 2);

        let map = agg.finish();
        assert_eq!(map["en"].len(), 1);
        assert_eq!(map["en"]["k"], "second");
    }

    #[test]
    fn export_enum_serializes_as_bare_map() {
        let mut flat = LocaleMap::new();
        flat.insert("k".into(), "v".into());
        let json = serde_json::to_value(Export::Locale(flat)).unwrap();
        assert_eq!(json, serde_json::json!({"k": "v"}));

        let json = serde_json::to_value(Export::All(ExportMap::new())).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn locale_export_equals_nested_entry() {
        let rows = vec![
            row("en", "a", "1"),
            row("en", "b", "2"),
            row("fr", "a", "un"),
        ];
        let nested = aggregate(rows.clone());
        // Same shape the single-locale repository path collects into.
        let flat: LocaleMap = rows
            .into_iter()
            .filter(|(l, _, _)| l == "en")
            .map(|(_, k, v)| (k, v))
            .collect();
        assert_eq!(nested["en"], flat);
    }

    #[test]
    fn aggregates_one_hundred_thousand_rows_quickly() {
        const LOCALES: [&str; 10] = ["de", "en", "es", "fr", "it", "ja", "nl", "pt", "ru", "zh"];
        let rows: Vec<_> = LOCALES
            .iter()
            .flat_map(|locale| {
                (0..10_000).map(move |i| {
                    (
                        locale.to_string(),
                        format!("common.key_{i:05}"),
                        format!("Value {i}"),
                    )
                })
            })
            .collect();

        let started = Instant::now();
        let map = aggregate(rows);
        let payload = serde_json::to_vec(&map).unwrap();
        let elapsed = started.elapsed();

        assert_eq!(map.len(), 10);
        assert_eq!(map["en"].len(), 10_000);
        assert!(!payload.is_empty());
        assert!(
            elapsed < Duration::from_millis(500),
            "aggregating 100k rows took {elapsed:?}"
        );
    }
}
