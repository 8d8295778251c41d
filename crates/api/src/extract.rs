//! Request extractors whose rejections render through [`AppError`].
//!
//! axum's own `Json`, `Query` and `Path` reject with plain-text bodies. The
//! wrappers here deserialize the same way but turn every rejection into a
//! 422 `VALIDATION_ERROR` carrying field errors, so clients always get the
//! JSON error envelope. `Json` also serves as the response wrapper.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::response::{IntoResponse, Response};
use lingo_core::error::{CoreError, FieldError};
use lingo_core::validation;
use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// Query parameters a deserialization error may be attributed to.
const QUERY_FIELDS: [&str; 7] = [
    "key",
    "locale",
    "content",
    "tags",
    "tag_logic",
    "per_page",
    "page",
];

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(rejection = %rejection.body_text(), "Rejected JSON body");

        let field = match &rejection {
            JsonRejection::JsonDataError(err) => body_field_error(&err.body_text()),
            JsonRejection::MissingJsonContentType(_) => Some(FieldError::new(
                "body",
                "The request body must be sent as application/json.",
            )),
            _ => None,
        };
        let field =
            field.unwrap_or_else(|| FieldError::new("body", "The request body is not valid JSON."));

        CoreError::InvalidFields(vec![field]).into()
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        let detail = rejection.body_text();
        tracing::debug!(rejection = %detail, "Rejected query string");

        let field = error_path(&detail)
            .and_then(|(name, _)| QUERY_FIELDS.into_iter().find(|f| *f == name))
            .map(|name| FieldError::new(name, format!("The {name} parameter is invalid.")))
            .unwrap_or_else(|| FieldError::new("query", "The query string is invalid."));

        CoreError::InvalidFields(vec![field]).into()
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(rejection = %rejection.body_text(), "Rejected path parameter");

        CoreError::InvalidFields(vec![FieldError::new("id", "The id must be an integer.")]).into()
    }
}

/// Attribute a JSON data error to a request body field.
///
/// Missing and `null` fields read as "required"; any other type mismatch
/// reads as "invalid". Returns `None` when no known field can be named.
fn body_field_error(detail: &str) -> Option<FieldError> {
    if let Some(name) = missing_field_name(detail) {
        return validation::missing_field(name);
    }
    let (name, message) = error_path(detail)?;
    if message.starts_with("invalid type: null") {
        validation::missing_field(name)
    } else {
        validation::malformed_field(name)
    }
}

/// The name inside "missing field `name`".
fn missing_field_name(detail: &str) -> Option<&str> {
    let (_, rest) = detail.split_once("missing field `")?;
    rest.split_once('`').map(|(name, _)| name)
}

/// Split "<prefix>: <path>: <message>" into the path's top-level field and
/// the message. The path is `field`, `field.inner` or `field[0]`.
fn error_path(detail: &str) -> Option<(&str, &str)> {
    let (_, rest) = detail.split_once(": ")?;
    let (path, message) = rest.split_once(": ")?;
    let field = path
        .split(['.', '['])
        .next()
        .filter(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))?;
    Some((field, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "Failed to deserialize the JSON body into the target type";

    #[test]
    fn missing_field_is_reported_as_required() {
        let detail = format!("{PREFIX}: missing field `value` at line 1 column 29");
        assert_eq!(
            body_field_error(&detail),
            Some(FieldError::new("value", "The translation value is required."))
        );
    }

    #[test]
    fn null_field_is_reported_as_required() {
        let detail =
            format!("{PREFIX}: name: invalid type: null, expected a string at line 1 column 12");
        assert_eq!(
            body_field_error(&detail).unwrap().message,
            "The tag name is required."
        );
    }

    #[test]
    fn nested_type_error_names_top_level_field() {
        let detail = format!(
            "{PREFIX}: tags[1]: invalid type: string \"x\", expected i64 at line 1 column 14"
        );
        assert_eq!(
            body_field_error(&detail),
            Some(FieldError::new("tags", "The tags field is invalid."))
        );
    }

    #[test]
    fn root_level_error_has_no_field() {
        let detail = format!(
            "{PREFIX}: invalid type: integer `5`, expected struct CreateTag at line 1 column 1"
        );
        assert_eq!(body_field_error(&detail), None);
    }

    #[test]
    fn query_error_path_is_parsed() {
        let detail = "Failed to deserialize query string: tag_logic: unknown variant `xor`";
        assert_eq!(error_path(detail), Some(("tag_logic", "unknown variant `xor`")));
    }
}
