//! Request field validation for translations and tags.
//!
//! Runs at the request boundary so malformed input never reaches the
//! repositories. Each `check_*` helper returns `Some(FieldError)` on failure;
//! [`collect`] turns a batch of checks into a single [`CoreError`].

use crate::error::{CoreError, FieldError};

/// Maximum length of a translation key, in characters.
pub const KEY_MAX_LEN: usize = 255;

/// Maximum length of a locale code, in characters.
pub const LOCALE_MAX_LEN: usize = 10;

/// Maximum length of a tag name, in characters.
pub const TAG_NAME_MAX_LEN: usize = 255;

/// Maximum length of the `content` search term, in characters.
pub const CONTENT_SEARCH_MAX_LEN: usize = 500;

pub fn check_key(key: &str) -> Option<FieldError> {
    check_required_bounded("key", "translation key", key, KEY_MAX_LEN)
}

pub fn check_locale(locale: &str) -> Option<FieldError> {
    check_required_bounded("locale", "locale", locale, LOCALE_MAX_LEN)
}

pub fn check_value(value: &str) -> Option<FieldError> {
    if value.trim().is_empty() {
        return Some(FieldError::new("value", "The translation value is required."));
    }
    None
}

pub fn check_tag_name(name: &str) -> Option<FieldError> {
    check_required_bounded("name", "tag name", name, TAG_NAME_MAX_LEN)
}

/// Length limits on optional search terms. Blank terms are allowed (ignored).
pub fn check_search_terms(
    key: Option<&str>,
    locale: Option<&str>,
    content: Option<&str>,
) -> Vec<Option<FieldError>> {
    vec![
        key.and_then(|k| check_max("key", "translation key", k, KEY_MAX_LEN)),
        locale.and_then(|l| check_max("locale", "locale", l, LOCALE_MAX_LEN)),
        content.and_then(|c| check_max("content", "content", c, CONTENT_SEARCH_MAX_LEN)),
    ]
}

pub fn check_email(email: &str) -> Option<FieldError> {
    let email = email.trim();
    if email.is_empty() {
        return Some(FieldError::new("email", "The email is required."));
    }
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
        && !email.chars().any(char::is_whitespace);
    if !well_formed {
        return Some(FieldError::new(
            "email",
            "The email must be a valid email address.",
        ));
    }
    None
}

pub fn check_password(password: &str) -> Option<FieldError> {
    if password.is_empty() {
        return Some(FieldError::new("password", "The password is required."));
    }
    None
}

/// "Required" error for a body field the deserializer reported missing or null.
///
/// `None` when `name` is not a field of any request body.
pub fn missing_field(name: &str) -> Option<FieldError> {
    request_field(name)
        .map(|(field, label)| FieldError::new(field, format!("The {label} is required.")))
}

/// Type error for a body field that was present but of the wrong shape.
pub fn malformed_field(name: &str) -> Option<FieldError> {
    request_field(name)
        .map(|(field, label)| FieldError::new(field, format!("The {label} is invalid.")))
}

fn request_field(name: &str) -> Option<(&'static str, &'static str)> {
    let known = match name {
        "key" => ("key", "translation key"),
        "locale" => ("locale", "locale"),
        "value" => ("value", "translation value"),
        "tags" => ("tags", "tags field"),
        "name" => ("name", "tag name"),
        "email" => ("email", "email"),
        "password" => ("password", "password"),
        _ => return None,
    };
    Some(known)
}

/// Reject a page size outside `[min, max]`.
pub fn check_per_page(per_page: Option<i64>, min: i64, max: i64) -> Option<FieldError> {
    match per_page {
        Some(n) if n < min || n > max => Some(FieldError::new(
            "per_page",
            format!("The per page must be between {min} and {max}."),
        )),
        _ => None,
    }
}

/// Reject a page number below 1.
pub fn check_page(page: Option<i64>) -> Option<FieldError> {
    match page {
        Some(n) if n < 1 => Some(FieldError::new("page", "The page must be at least 1.")),
        _ => None,
    }
}

/// Fold individual check results into `Ok(())` or `CoreError::InvalidFields`.
pub fn collect<I>(checks: I) -> Result<(), CoreError>
where
    I: IntoIterator<Item = Option<FieldError>>,
{
    let errors: Vec<FieldError> = checks.into_iter().flatten().collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::InvalidFields(errors))
    }
}

fn check_required_bounded(
    field: &'static str,
    label: &str,
    input: &str,
    max: usize,
) -> Option<FieldError> {
    if input.trim().is_empty() {
        return Some(FieldError::new(field, format!("The {label} is required.")));
    }
    check_max(field, label, input, max)
}

fn check_max(field: &'static str, label: &str, input: &str, max: usize) -> Option<FieldError> {
    if input.chars().count() > max {
        return Some(FieldError::new(
            field,
            format!("The {label} must not exceed {max} characters."),
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_translation_fields_pass() {
        let result = collect([
            check_key("common.welcome"),
            check_locale("en"),
            check_value("Welcome"),
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn missing_fields_are_reported_individually() {
        let result = collect([check_key(""), check_locale(" "), check_value("")]);
        match result {
            Err(CoreError::InvalidFields(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, ["key", "locale", "value"]);
                assert_eq!(errors[0].message, "The translation key is required.");
            }
            other => panic!("expected InvalidFields, got {other:?}"),
        }
    }

    #[test]
    fn key_length_is_bounded_in_characters() {
        assert!(check_key(&"k".repeat(KEY_MAX_LEN)).is_none());
        assert!(check_key(&"k".repeat(KEY_MAX_LEN + 1)).is_some());
        // Multi-byte characters count once.
        assert!(check_key(&"é".repeat(KEY_MAX_LEN)).is_none());
    }

    #[test]
    fn locale_longer_than_ten_chars_fails() {
        let err = check_locale("en-US-x-long").unwrap();
        assert_eq!(err.field, "locale");
        assert_eq!(err.message, "The locale must not exceed 10 characters.");
    }

    #[test]
    fn tag_name_required() {
        assert_eq!(
            check_tag_name("").unwrap().message,
            "The tag name is required."
        );
        assert!(check_tag_name("mobile").is_none());
    }

    #[test]
    fn search_terms_allow_absent_values() {
        assert!(collect(check_search_terms(None, None, None)).is_ok());
        assert!(collect(check_search_terms(Some(""), Some("en"), Some("x"))).is_ok());
    }

    #[test]
    fn search_content_is_bounded() {
        let long = "c".repeat(CONTENT_SEARCH_MAX_LEN + 1);
        assert!(collect(check_search_terms(None, None, Some(&long))).is_err());
    }

    #[test]
    fn per_page_bounds() {
        assert!(check_per_page(None, 1, 100).is_none());
        assert!(check_per_page(Some(1), 1, 100).is_none());
        assert!(check_per_page(Some(100), 1, 100).is_none());
        assert!(check_per_page(Some(0), 1, 100).is_some());
        assert!(check_per_page(Some(101), 1, 100).is_some());
    }

    #[test]
    fn email_must_look_like_an_address() {
        assert!(check_email("admin@example.com").is_none());
        assert_eq!(check_email("").unwrap().message, "The email is required.");
        assert_eq!(
            check_email("not-an-email").unwrap().message,
            "The email must be a valid email address."
        );
        assert!(check_email("a b@example.com").is_some());
        assert!(check_email("@example.com").is_some());
    }

    #[test]
    fn password_required() {
        assert!(check_password("").is_some());
        assert!(check_password("secret").is_none());
    }

    #[test]
    fn missing_body_fields_use_field_labels() {
        assert_eq!(
            missing_field("value").unwrap(),
            FieldError::new("value", "The translation value is required.")
        );
        assert_eq!(
            malformed_field("tags").unwrap().message,
            "The tags field is invalid."
        );
        assert!(missing_field("unexpected").is_none());
    }

    #[test]
    fn page_must_be_positive() {
        assert!(check_page(Some(1)).is_none());
        assert!(check_page(Some(0)).is_some());
    }
}
