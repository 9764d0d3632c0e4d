use crate::{CorkboardError, CorkboardResult};
use uuid::Uuid;

pub const TITLE_MIN_LEN: usize = 3;
pub const TITLE_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 3000;
pub const COMMENT_MAX_LEN: usize = 2000;

/// Parse an entity id from its wire representation.
/// Malformed ids are a validation error, reported before any persistence access.
pub fn parse_id(field: &str, raw: &str) -> CorkboardResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| CorkboardError::invalid_field(field, format!("'{raw}' is not a valid id")))
}

pub fn validate_title(field: &str, title: &str) -> CorkboardResult<()> {
    let trimmed = title.trim();
    if trimmed.len() < TITLE_MIN_LEN {
        return Err(CorkboardError::invalid_field(
            field,
            format!("must be at least {TITLE_MIN_LEN} characters"),
        ));
    }
    if trimmed.len() > TITLE_MAX_LEN {
        return Err(CorkboardError::invalid_field(
            field,
            format!("must be at most {TITLE_MAX_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn validate_description(field: &str, description: &str) -> CorkboardResult<()> {
    if description.len() > DESCRIPTION_MAX_LEN {
        return Err(CorkboardError::invalid_field(
            field,
            format!("must be at most {DESCRIPTION_MAX_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn validate_comment(field: &str, content: &str) -> CorkboardResult<()> {
    if content.trim().is_empty() {
        return Err(CorkboardError::invalid_field(field, "must not be empty"));
    }
    if content.len() > COMMENT_MAX_LEN {
        return Err(CorkboardError::invalid_field(
            field,
            format!("must be at most {COMMENT_MAX_LEN} characters"),
        ));
    }
    Ok(())
}

/// Derive a url-friendly slug from a board title.
pub fn slugify(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
