//! Form validation
//!
//! Forms are checked before anything is sent; failures come back per field
//! and never reach the network layer.

use campusdesk_core::{CampusError, CampusResult, FieldErrors};
use regex::Regex;
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static CODE_REGEX: OnceLock<Regex> = OnceLock::new();

pub fn is_valid_email(email: &str) -> bool {
    let regex = EMAIL_REGEX
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
    regex.is_match(email)
}

/// Short uppercase identifiers such as `CSE`, `CS-101` or `ENG_2`
pub fn is_valid_code(code: &str) -> bool {
    let regex = CODE_REGEX.get_or_init(|| Regex::new(r"^[A-Z0-9][A-Z0-9_-]{1,19}$").unwrap());
    regex.is_match(code)
}

/// Implemented by every form payload
pub trait Validate {
    /// All field problems; empty when the form may be submitted
    fn validate(&self) -> FieldErrors;

    /// `Err(CampusError::Validation)` carrying the field errors, if any
    fn ensure_valid(&self, component: &str) -> CampusResult<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CampusError::validation(errors, component))
        }
    }
}

/// Accumulates field errors; the first problem found for a field wins
#[derive(Debug, Default)]
pub struct FieldCheck {
    errors: FieldErrors,
}

impl FieldCheck {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.fail(field, "is required");
        }
        self
    }

    pub fn email(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.fail(field, "is required");
        } else if !is_valid_email(value) {
            self.fail(field, "must be a valid email address");
        }
        self
    }

    pub fn code(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.fail(field, "is required");
        } else if !is_valid_code(value) {
            self.fail(
                field,
                "must be 2-20 uppercase letters, digits, '-' or '_'",
            );
        }
        self
    }

    pub fn max_len(mut self, field: &str, value: &str, max: usize) -> Self {
        if value.chars().count() > max {
            self.fail(field, format!("must be at most {} characters", max));
        }
        self
    }

    pub fn range<T>(mut self, field: &str, value: T, min: T, max: T) -> Self
    where
        T: PartialOrd + std::fmt::Display,
    {
        if value < min || value > max {
            self.fail(field, format!("must be between {} and {}", min, max));
        }
        self
    }

    /// Record `message` for `field` when `ok` is false
    pub fn check(mut self, field: &str, ok: bool, message: &str) -> Self {
        if !ok {
            self.fail(field, message);
        }
        self
    }

    pub fn finish(self) -> FieldErrors {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_format() {
        assert!(is_valid_email("registrar@uni.edu"));
        assert!(!is_valid_email("registrar@uni"));
        assert!(!is_valid_email("reg istrar@uni.edu"));
        assert!(!is_valid_email(" registrar@uni.edu"));
    }

    #[test]
    fn code_format() {
        assert!(is_valid_code("CSE"));
        assert!(is_valid_code("CS-101"));
        assert!(!is_valid_code("cs101"));
        assert!(!is_valid_code("C"));
        assert!(!is_valid_code("-CS"));
    }

    #[test]
    fn email_is_checked_as_submitted() {
        let errors = FieldCheck::new()
            .email("email", "registrar@uni.edu ")
            .finish();
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("must be a valid email address")
        );
        assert!(FieldCheck::new().email("email", "registrar@uni.edu").finish().is_empty());
    }

    #[test]
    fn first_error_per_field_wins() {
        let errors = FieldCheck::new()
            .required("name", "  ")
            .max_len("name", "  ", 1)
            .range("credits", 9u8, 1, 6)
            .email("email", "nope")
            .finish();

        assert_eq!(errors.get("name").map(String::as_str), Some("is required"));
        assert_eq!(
            errors.get("credits").map(String::as_str),
            Some("must be between 1 and 6")
        );
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("must be a valid email address")
        );
    }
}
