// Validation for the plain (non-temporal) fields of a todo

use crate::error::ValidationError;
use crate::models::{DEFAULT_PRIORITY, HIGHEST_PRIORITY, LOWEST_PRIORITY};

/// Parse a priority; empty input falls back to the default
pub fn parse_priority(text: &str) -> Result<u8, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(DEFAULT_PRIORITY);
    }

    text.parse::<u8>()
        .ok()
        .filter(|p| (HIGHEST_PRIORITY..=LOWEST_PRIORITY).contains(p))
        .ok_or_else(|| ValidationError::InvalidPriority(text.to_string()))
}

/// Trim a title and reject it when nothing is left
pub fn validate_title(text: &str) -> Result<String, ValidationError> {
    let title = text.trim();
    if title.is_empty() {
        Err(ValidationError::EmptyTitle)
    } else {
        Ok(title.to_string())
    }
}
