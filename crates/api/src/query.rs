//! Shared query parameter types for API handlers.
//!
//! Raw query strings deserialize into these structs; handlers validate them
//! and convert them into `lingo_core::search` types. Numeric parameters are
//! taken as strings and parsed here so a non-numeric value is reported as a
//! field error on that parameter.

use lingo_core::error::FieldError;
use lingo_core::search::{
    parse_id_list, Pagination, TagFilterLogic, TranslationFilter, MAX_PER_PAGE, MIN_PER_PAGE,
};
use lingo_core::validation;
use serde::Deserialize;

use crate::error::AppResult;

/// Page-based pagination parameters (`?per_page=&page=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub per_page: Option<String>,
    pub page: Option<String>,
}

impl PaginationParams {
    /// Validate bounds and resolve defaults.
    pub fn into_pagination(self) -> AppResult<Pagination> {
        let (per_page, page, checks) = pagination_checks(self.per_page, self.page);
        validation::collect(checks)?;
        Ok(Pagination::new(page, per_page))
    }
}

/// Parse and bound-check `per_page` and `page`.
///
/// Returns the parsed values (unparseable ones as `None`) and one check
/// result per parameter.
fn pagination_checks(
    per_page: Option<String>,
    page: Option<String>,
) -> (Option<i64>, Option<i64>, [Option<FieldError>; 2]) {
    let per_page = parse_integer("per_page", "per page", per_page.as_deref());
    let page = parse_integer("page", "page", page.as_deref());

    let per_page_check = match &per_page {
        Ok(n) => validation::check_per_page(*n, MIN_PER_PAGE, MAX_PER_PAGE),
        Err(e) => Some(e.clone()),
    };
    let page_check = match &page {
        Ok(n) => validation::check_page(*n),
        Err(e) => Some(e.clone()),
    };

    (
        per_page.ok().flatten(),
        page.ok().flatten(),
        [per_page_check, page_check],
    )
}

/// Parse an optional integer parameter. Blank is treated as absent.
fn parse_integer(
    field: &'static str,
    label: &str,
    raw: Option<&str>,
) -> Result<Option<i64>, FieldError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| FieldError::new(field, format!("The {label} must be an integer."))),
    }
}

/// Trim a search term; blank becomes absent.
fn search_term(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Query parameters for `GET /translations/search`.
///
/// `tags` is a comma-separated id list (`?tags=1,4`). The text terms `key`,
/// `locale` and `content` are trimmed before matching, and a blank term is
/// the same as an absent one. Pagination fields are inlined rather than
/// flattened so unknown-field handling stays with this struct.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub key: Option<String>,
    pub locale: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
    pub tag_logic: Option<TagFilterLogic>,
    pub per_page: Option<String>,
    pub page: Option<String>,
}

impl SearchParams {
    /// Validate every field and split into a filter and a page request.
    pub fn into_filter(self) -> AppResult<(TranslationFilter, Pagination)> {
        let tags = match self.tags.as_deref().map(parse_id_list) {
            None => Ok(Vec::new()),
            Some(Ok(ids)) => Ok(ids),
            Some(Err(segment)) => Err(FieldError::new(
                "tags",
                format!("The tags must be a comma-separated list of ids, got '{segment}'."),
            )),
        };

        let key = search_term(self.key);
        let locale = search_term(self.locale);
        let content = search_term(self.content);
        let (per_page, page, page_checks) = pagination_checks(self.per_page, self.page);

        let mut checks =
            validation::check_search_terms(key.as_deref(), locale.as_deref(), content.as_deref());
        checks.extend(page_checks);
        checks.push(tags.as_ref().err().cloned());
        validation::collect(checks)?;

        let filter = TranslationFilter {
            key,
            locale,
            content,
            tags: tags.unwrap_or_default(),
            tag_logic: self.tag_logic.unwrap_or_default(),
        };
        Ok((filter, Pagination::new(page, per_page)))
    }
}

/// Query parameters for `GET /export`.
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    pub locale: Option<String>,
}

impl ExportParams {
    /// The requested locale, with blank treated as absent.
    pub fn locale(&self) -> Option<&str> {
        self.locale
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use lingo_core::error::CoreError;

    use super::*;
    use crate::error::AppError;

    #[test]
    fn search_params_parse_tag_list() {
        let params = SearchParams {
            tags: Some("3, 1".into()),
            tag_logic: Some(TagFilterLogic::And),
            ..Default::default()
        };
        let (filter, pagination) = params.into_filter().unwrap();
        assert_eq!(filter.tags, vec![3, 1]);
        assert_eq!(filter.tag_logic, TagFilterLogic::And);
        assert_eq!(pagination, Pagination::default());
    }

    #[test]
    fn search_params_reject_bad_tag_segment() {
        let params = SearchParams {
            tags: Some("1,x".into()),
            ..Default::default()
        };
        assert_matches!(
            params.into_filter(),
            Err(AppError::Core(CoreError::InvalidFields(fields))) if fields[0].field == "tags"
        );
    }

    #[test]
    fn all_text_terms_are_trimmed_and_blank_dropped() {
        let params = SearchParams {
            key: Some("  common. ".into()),
            locale: Some(" en ".into()),
            content: Some("   ".into()),
            ..Default::default()
        };
        let (filter, _) = params.into_filter().unwrap();
        assert_eq!(filter.key.as_deref(), Some("common."));
        assert_eq!(filter.locale.as_deref(), Some("en"));
        assert_eq!(filter.content, None);
    }

    #[test]
    fn locale_length_is_checked_after_trimming() {
        let params = SearchParams {
            locale: Some("  en-US  ".into()),
            ..Default::default()
        };
        assert!(params.into_filter().is_ok());
    }

    #[test]
    fn per_page_out_of_range_is_rejected() {
        let params = PaginationParams {
            per_page: Some("101".into()),
            page: None,
        };
        assert_matches!(
            params.into_pagination(),
            Err(AppError::Core(CoreError::InvalidFields(_)))
        );
    }

    #[test]
    fn non_numeric_page_parameters_are_field_errors() {
        let params = PaginationParams {
            per_page: Some("abc".into()),
            page: Some("2x".into()),
        };
        match params.into_pagination() {
            Err(AppError::Core(CoreError::InvalidFields(fields))) => {
                assert_eq!(
                    fields[0],
                    FieldError::new("per_page", "The per page must be an integer.")
                );
                assert_eq!(fields[1].field, "page");
            }
            other => panic!("expected InvalidFields, got {other:?}"),
        }
    }

    #[test]
    fn numeric_strings_resolve_to_pagination() {
        let params = PaginationParams {
            per_page: Some(" 25 ".into()),
            page: Some("3".into()),
        };
        assert_eq!(params.into_pagination().unwrap(), Pagination::new(Some(3), Some(25)));
    }

    #[test]
    fn blank_export_locale_is_absent() {
        let params = ExportParams {
            locale: Some("  ".into()),
        };
        assert_eq!(params.locale(), None);
        let params = ExportParams {
            locale: Some("en".into()),
        };
        assert_eq!(params.locale(), Some("en"));
    }
}
