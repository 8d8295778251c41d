use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lingo_core::error::{CoreError, FieldError};
use serde_json::{json, Map, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `lingo_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx. Unique violations never land here; see
    /// the `From<sqlx::Error>` impl.
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<sqlx::Error> for AppError {
    /// Unique-constraint violations on a user-facing `uq_` constraint become
    /// [`CoreError::Conflict`] on the field the constraint guards.
    fn from(err: sqlx::Error) -> Self {
        match unique_violation_field(&err) {
            Some(field) => AppError::Core(CoreError::Conflict {
                field,
                message: conflict_message(field),
            }),
            None => AppError::Database(err),
        }
    }
}

/// The request field guarded by the unique constraint `err` violated, if any.
fn unique_violation_field(err: &sqlx::Error) -> Option<&'static str> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    // PostgreSQL unique constraint violation: error code 23505
    if db_err.code().as_deref() != Some("23505") {
        return None;
    }
    let constraint = db_err.constraint()?;
    let field = lingo_db::unique_constraint_field(constraint)?;
    tracing::debug!(constraint, field, "Unique constraint violated");
    Some(field)
}

/// Status, machine-readable code, message and optional per-field errors.
struct ErrorParts {
    status: StatusCode,
    code: &'static str,
    message: String,
    fields: Vec<FieldError>,
}

impl ErrorParts {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }

    fn conflict(field: &'static str, message: String) -> Self {
        Self {
            fields: vec![FieldError::new(field, message.clone())],
            ..Self::new(StatusCode::UNPROCESSABLE_ENTITY, "CONFLICT", message)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let parts = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => ErrorParts::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::InvalidFields(fields) => {
                    let message = fields
                        .first()
                        .map(|f| f.message.clone())
                        .unwrap_or_else(|| "The given data was invalid.".to_string());
                    ErrorParts {
                        fields,
                        ..ErrorParts::new(
                            StatusCode::UNPROCESSABLE_ENTITY,
                            "VALIDATION_ERROR",
                            message,
                        )
                    }
                }
                CoreError::Conflict { field, message } => ErrorParts::conflict(field, message),
                CoreError::Unauthorized(msg) => {
                    ErrorParts::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(&err),

            // --- HTTP-specific errors ---
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorParts::internal()
            }
        };

        let mut body = json!({
            "error": parts.message,
            "code": parts.code,
        });
        if !parts.fields.is_empty() {
            body["errors"] = field_errors_json(&parts.fields);
        }

        (parts.status, axum::Json(body)).into_response()
    }
}

/// Group field errors as `{ "field": ["message", ...] }`, preserving order.
fn field_errors_json(fields: &[FieldError]) -> Value {
    let mut map = Map::new();
    for error in fields {
        let entry = map
            .entry(error.field)
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(messages) = entry {
            messages.push(Value::String(error.message.clone()));
        }
    }
    Value::Object(map)
}

/// User-facing message for a uniqueness violation on `field`.
fn conflict_message(field: &str) -> String {
    match field {
        "key" => "The translation key has already been taken for this locale.".to_string(),
        "name" => "The tag name has already been taken.".to_string(),
        other => format!("The {other} has already been taken."),
    }
}

/// Classify a sqlx error that is not a known uniqueness conflict.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => {
            ErrorParts::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        other => {
            tracing::error!(error = %other, "Database error");
            ErrorParts::internal()
        }
    }
}
