//! Explicit input validation.
//!
//! Handlers collect every failing field before rejecting a request, so a
//! client sees all problems at once in the `fields` map of the error body.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, FieldErrors};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

static EXPIRATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])/([0-9]{2}|[0-9]{4})$").expect("valid expiration regex")
});

/// Accumulates field errors. The first message recorded for a field wins.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless `ok` holds.
    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.errors
                .entry(field.to_string())
                .or_insert_with(|| message.to_string());
        }
        self
    }

    /// Field must contain something other than whitespace.
    pub fn required(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        self.check(field, !value.trim().is_empty(), message)
    }

    /// Field must not exceed `max` characters.
    pub fn max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        let ok = value.chars().count() <= max;
        self.check(field, ok, &format!("Must be at most {max} characters"))
    }

    pub fn finish(&mut self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// `true` when `value` is only ASCII digits and its length lies in `min..=max`.
pub fn is_digits(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

/// Card expiration in `MM/YY` or `MM/YYYY` form.
pub fn is_valid_expiration(value: &str) -> bool {
    EXPIRATION_RE.is_match(value)
}

/// Trimmed value of an optional patch field, `None` when absent or blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failing_field() {
        let mut v = Validator::new();
        v.required("email", " ", "Email is required")
            .required("password", "", "Password is required")
            .required("first_name", "Ana", "First name is required");

        match v.finish() {
            Err(AppError::Validation(fields)) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields["email"], "Email is required");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn first_message_per_field_wins() {
        let mut v = Validator::new();
        v.required("email", "", "Email is required")
            .check("email", is_valid_email(""), "Invalid email address");
        let Err(AppError::Validation(fields)) = v.finish() else {
            panic!("expected validation error");
        };
        assert_eq!(fields["email"], "Email is required");
    }

    #[test]
    fn passes_when_nothing_recorded() {
        let mut v = Validator::new();
        v.max_len("alias", "sol.luna.mar", 100);
        assert!(v.finish().is_ok());
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("ana@example.com"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example@x.com"));
    }

    #[test]
    fn digit_ranges() {
        assert!(is_digits("4111111111111", 13, 19));
        assert!(!is_digits("411111111111", 13, 19));
        assert!(!is_digits("41111111111111111111", 13, 19));
        assert!(!is_digits("4111-1111-1111-1", 13, 19));
    }

    #[test]
    fn expiration_formats() {
        assert!(is_valid_expiration("09/27"));
        assert!(is_valid_expiration("12/2030"));
        assert!(!is_valid_expiration("13/27"));
        assert!(!is_valid_expiration("00/27"));
        assert!(!is_valid_expiration("9/27"));
        assert!(!is_valid_expiration("09/270"));
    }

    #[test]
    fn blank_patch_fields_are_ignored() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" new.alias ")), Some("new.alias"));
    }
}
