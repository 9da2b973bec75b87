use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::models::{ApplicationForm, InquiryForm};
use crate::{Error, Result};

/// Loose `local@domain.tld` check, equivalent to a browser's `type="email"`
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

/// Whether `value` looks like an email address
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    match email_regex() {
        Some(re) => re.is_match(value),
        None => value.contains('@'),
    }
}

/// One rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Error shown when no position was chosen
pub const POSITION_REQUIRED: &str = "Please select a position";

fn required(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError {
            field,
            message: "This field is required",
        });
    }
}

fn email(errors: &mut Vec<FieldError>, value: &str) {
    if value.trim().is_empty() {
        required(errors, "email", value);
    } else if !is_valid_email(value) {
        errors.push(FieldError {
            field: "email",
            message: "Please enter a valid email address",
        });
    }
}

/// Form-level validation
pub trait Validate {
    fn field_errors(&self) -> Vec<FieldError>;

    fn validate(&self) -> Result<()> {
        let errors = self.field_errors();
        if errors.is_empty() {
            return Ok(());
        }
        let joined = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
        Err(Error::Validation(joined))
    }
}

impl Validate for InquiryForm {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        required(&mut errors, "name", &self.name);
        email(&mut errors, &self.email);
        required(&mut errors, "message", &self.message);
        errors
    }
}

impl Validate for ApplicationForm {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        required(&mut errors, "name", &self.name);
        email(&mut errors, &self.email);
        if self.position.is_none() {
            errors.push(FieldError {
                field: "position",
                message: POSITION_REQUIRED,
            });
        }
        required(&mut errors, "location", &self.location);
        required(&mut errors, "coverLetter", &self.cover_letter);
        required(&mut errors, "experience", &self.experience);
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::models::Position;

    #[test]
    fn test_email_check() {
        assert!(is_valid_email("hello@averbuch.foundation"));
        assert!(is_valid_email(" a.b+c@mail.example.co.uk "));
        assert!(!is_valid_email("hello"));
        assert!(!is_valid_email("hello@localhost"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_inquiry_company_is_optional() {
        let form = InquiryForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            company: None,
            message: "Hi".into(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_application_requires_position() {
        let mut form = ApplicationForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: String::new(),
            position: None,
            location: "Boston".into(),
            cover_letter: "Hi".into(),
            experience: "Some".into(),
        };
        let errors = form.field_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, POSITION_REQUIRED);

        form.position = Some(Position::ClientOutreach);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_blank_fields_reported() {
        let errors = InquiryForm::default().field_errors();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "message"]);
    }
}
