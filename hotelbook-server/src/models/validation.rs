//! Validation error types and shared field checks

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., email)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Invalid enum variant
    InvalidVariant { field: &'static str, value: String },

    /// Number or date outside the accepted range
    OutOfRange { field: &'static str, reason: String },

    /// Body, query string or path could not be parsed at all
    Malformed { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::OutOfRange { field, reason } => write!(f, "{}: {}", field, reason),
            Self::Malformed { reason } => write!(f, "malformed request: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim and bound a required text field.
pub(crate) fn required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Trim and bound a free-text field that may be empty.
pub(crate) fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.unwrap_or_default().trim();
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Reject non-positive ids before they reach a query.
pub(crate) fn positive_id(field: &'static str, id: i32) -> Result<i32, ValidationError> {
    if id <= 0 {
        return Err(ValidationError::OutOfRange {
            field,
            reason: format!("must be a positive integer, got {}", id),
        });
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "TypeName",
            max: 50,
        };
        assert_eq!(
            err.to_string(),
            "TypeName exceeds maximum length of 50 characters"
        );
    }

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text("Name", "  Pool ", 10).unwrap(), "Pool");
        assert_eq!(
            required_text("Name", "   ", 10).unwrap_err(),
            ValidationError::Empty { field: "Name" }
        );
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        // 5 chars, 10 bytes
        assert!(required_text("Name", "ééééé", 5).is_ok());
        assert!(optional_text("Description", Some("ééééé"), 4).is_err());
    }

    #[test]
    fn optional_text_defaults_to_empty() {
        assert_eq!(optional_text("Description", None, 10).unwrap(), "");
    }

    #[test]
    fn positive_id_rejects_zero() {
        assert!(positive_id("RoomID", 0).is_err());
        assert_eq!(positive_id("RoomID", 7).unwrap(), 7);
    }
}
