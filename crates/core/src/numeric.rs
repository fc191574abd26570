//! Conversions between form input text and nullable draft values.
//!
//! Drafts keep every numeric field as `Option<f64>` / `Option<i64>` so an
//! untouched input (`None`) stays distinguishable from an explicit zero.
//! Text only exists at the input boundary, handled here.

use crate::error::CoreError;

/// Separator used when a list of strings is edited as one text field.
pub const LIST_DELIMITER: char = ',';

/// Parse a decimal input. Blank input is `None`.
pub fn parse_decimal_input(input: &str) -> Result<Option<f64>, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| CoreError::invalid_number(trimmed, "number"))?;
    if !value.is_finite() {
        return Err(CoreError::invalid_number(trimmed, "finite number"));
    }
    Ok(Some(value))
}

/// Parse a whole-number input. Blank input is `None`.
pub fn parse_integer_input(input: &str) -> Result<Option<i64>, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| CoreError::invalid_number(trimmed, "whole number"))
}

/// Render a nullable decimal for a text input. `None` renders blank.
pub fn format_decimal_input(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Render a nullable whole number for a text input. `None` renders blank.
pub fn format_integer_input(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Split a delimited text field into trimmed, non-empty entries.
pub fn split_delimited(input: &str) -> Vec<String> {
    input
        .split(LIST_DELIMITER)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Join entries back into the single text field they are edited in.
pub fn join_delimited(entries: &[String]) -> String {
    entries.join(", ")
}

/// Blank (empty or whitespace-only) text becomes `None`.
pub fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
