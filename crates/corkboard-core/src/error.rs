use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorkboardError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Domain(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CorkboardError {
    /// Validation error for a named field, keeping the field visible to the caller.
    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation(format!("{}: {}", field, reason.into()))
    }
}

impl From<serde_json::Error> for CorkboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
