//! User input validation
//!
//! Emails are stored lowercased so uniqueness is case-insensitive.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::required_text;
use super::ValidationError;

const MAX_EMAIL_LEN: usize = 254;
const MAX_FULL_NAME_LEN: usize = 100;

/// Pragmatic address check: one `@`, no whitespace, dotted domain.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex")
});

/// Validated, lowercased email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "Email" });
        }
        if s.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "Email",
                max: MAX_EMAIL_LEN,
            });
        }
        if !EMAIL_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "Email",
                reason: "must look like name@example.com",
            });
        }
        Ok(Self(s.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// User role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[default]
    Guest,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "Guest",
            Self::Admin => "Admin",
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Guest" => Ok(Self::Guest),
            "Admin" => Ok(Self::Admin),
            other => Err(ValidationError::InvalidVariant {
                field: "Role",
                value: other.to_owned(),
            }),
        }
    }
}

/// Validated user fields for create and update
#[derive(Debug, Clone, PartialEq)]
pub struct UserInput {
    pub email: Email,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
}

impl UserInput {
    pub fn new(
        email: &str,
        full_name: &str,
        role: Option<Role>,
        is_active: Option<bool>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            email: Email::new(email)?,
            full_name: required_text("FullName", full_name, MAX_FULL_NAME_LEN)?,
            role: role.unwrap_or_default(),
            is_active: is_active.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_lowercased() {
        let email = Email::new("  Guest@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "guest@example.com");
    }

    #[test]
    fn rejects_bad_emails() {
        assert!(matches!(
            Email::new("").unwrap_err(),
            ValidationError::Empty { .. }
        ));
        assert!(matches!(
            Email::new("no-at-sign").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
        assert!(matches!(
            Email::new("a b@example.com").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
    }

    #[test]
    fn role_round_trips_through_text() {
        for role in [Role::Guest, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn input_defaults() {
        let input = UserInput::new("a@b.io", "Ada", None, None).unwrap();
        assert_eq!(input.role, Role::Guest);
        assert!(input.is_active);
    }
}
