use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Field-level validation failures collected at the request boundary.
    #[error("Validation failed on {} field(s)", .0.len())]
    InvalidFields(Vec<FieldError>),

    /// A uniqueness rule was violated (`key`+`locale`, or tag `name`).
    #[error("Conflict on {field}: {message}")]
    Conflict {
        field: &'static str,
        message: String,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
