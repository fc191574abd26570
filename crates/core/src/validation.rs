//! Save-time field validation shared by every entity form.
//!
//! Drafts accept anything while the user is typing; these checks only run
//! when a draft is turned into a submission payload.

use chrono::NaiveDate;

use crate::error::CoreError;

/// Maximum length of an entity display name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of free-text descriptions and notes.
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Validate a required display name: non-empty after trimming and within
/// [`MAX_NAME_LENGTH`].
pub fn validate_name(field: &str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional free-text field against [`MAX_TEXT_LENGTH`].
pub fn validate_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_TEXT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional latitude/longitude pair.
pub fn validate_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), CoreError> {
    if let Some(lat) = latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoreError::Validation(format!(
                "Latitude {lat} must be between -90 and 90"
            )));
        }
    }
    if let Some(lng) = longitude {
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoreError::Validation(format!(
                "Longitude {lng} must be between -180 and 180"
            )));
        }
    }
    Ok(())
}

/// Validate that an optional decimal is not negative.
pub fn validate_non_negative(field: &str, value: Option<f64>) -> Result<(), CoreError> {
    match value {
        Some(v) if v < 0.0 => Err(CoreError::Validation(format!(
            "{field} must not be negative"
        ))),
        _ => Ok(()),
    }
}

/// Validate that an optional whole number is not negative.
pub fn validate_non_negative_count(field: &str, value: Option<i64>) -> Result<(), CoreError> {
    match value {
        Some(v) if v < 0 => Err(CoreError::Validation(format!(
            "{field} must not be negative"
        ))),
        _ => Ok(()),
    }
}

/// Validate that a date range is not inverted. Open ends are accepted.
pub fn validate_date_range(
    field: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(CoreError::Validation(format!(
                "{field} ends ({end}) before it starts ({start})"
            )));
        }
    }
    Ok(())
}
