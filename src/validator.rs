// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Field validation and sanitization for submitted forms.
//!
//! The predicates are the same rules the site's browser forms apply for
//! instant feedback; the server-side checks here are the authoritative ones.
//!
//! - Names: 2-100 characters after trimming
//! - Emails: `local@domain.tld` shape, no whitespace
//! - Phones: optional, international-looking digit groups
//! - Messages and comments: 10 characters up to a per-form maximum
//! - Ratings: whole numbers 1-5

use crate::config::ValidationConfig;
use crate::submission::{
    field_text, Budget, ContactForm, ContactSubmission, ReviewForm, ReviewSubmission,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_RE: Regex =
        Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,4}[-\s.]?[0-9]{1,9}$").unwrap();
}

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid name")]
    InvalidName,

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Invalid phone number")]
    InvalidPhone,

    #[error("Message must be {min}-{max} characters")]
    MessageLength { min: usize, max: usize },

    #[error("Comment must be {min}-{max} characters")]
    CommentLength { min: usize, max: usize },

    #[error("Rating must be 1-5")]
    InvalidRating,
}

impl ValidationError {
    /// Name of the offending form field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidName => "name",
            Self::InvalidEmail => "email",
            Self::InvalidPhone => "phone",
            Self::MessageLength { .. } => "message",
            Self::CommentLength { .. } => "comment",
            Self::InvalidRating => "rating",
        }
    }
}

/// Field name to human-readable reason.
pub type FieldErrors = BTreeMap<&'static str, String>;

fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

/// Best-effort email shape check. Not RFC 5322.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_name(value: &str) -> bool {
    (2..=100).contains(&trimmed_len(value))
}

pub fn is_valid_message(value: &str, min_len: usize, max_len: usize) -> bool {
    (min_len..=max_len).contains(&trimmed_len(value))
}

/// Empty means "not given" and is valid.
pub fn is_valid_phone(value: &str) -> bool {
    value.is_empty() || PHONE_RE.is_match(value)
}

/// Accepts whole numbers 1 through 5. Strings and other types are never coerced.
pub fn is_valid_rating(value: &Value) -> bool {
    rating_of(value).is_some()
}

fn rating_of(value: &Value) -> Option<u8> {
    let n = value.as_f64()?;
    if n.fract() == 0.0 && (1.0..=5.0).contains(&n) {
        Some(n as u8)
    } else {
        None
    }
}

/// Trim, truncate to `max_length` characters, then strip `<` and `>`.
pub fn sanitize(input: &str, max_length: usize) -> String {
    input
        .trim()
        .chars()
        .take(max_length)
        .filter(|c| !matches!(c, '<' | '>'))
        .collect()
}

/// Form-level validator for contact and review submissions.
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    config: ValidationConfig,
}

impl FormValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    fn check_name(&self, name: Option<&str>) -> Option<ValidationError> {
        let valid = name.is_some_and(|n| {
            (self.config.name_min..=self.config.name_max).contains(&trimmed_len(n))
        });
        (!valid).then_some(ValidationError::InvalidName)
    }

    fn check_required_email(&self, email: Option<&str>) -> Option<ValidationError> {
        (!email.is_some_and(is_valid_email)).then_some(ValidationError::InvalidEmail)
    }

    // Absent, null and "" mean the field was left blank
    fn check_optional_email(&self, email: Option<&Value>) -> Option<ValidationError> {
        match email {
            None | Some(Value::Null) => None,
            Some(Value::String(e)) if e.is_empty() => None,
            Some(other) => self.check_required_email(other.as_str()),
        }
    }

    fn check_phone(&self, phone: Option<&Value>) -> Option<ValidationError> {
        let valid = match phone {
            None | Some(Value::Null) => true,
            Some(Value::String(p)) => is_valid_phone(p),
            Some(_) => false,
        };
        (!valid).then_some(ValidationError::InvalidPhone)
    }

    fn check_message(&self, message: Option<&str>) -> Option<ValidationError> {
        let (min, max) = (self.config.message_min, self.config.contact_message_max);
        let valid = message.is_some_and(|m| is_valid_message(m, min, max));
        (!valid).then_some(ValidationError::MessageLength { min, max })
    }

    fn check_comment(&self, comment: Option<&str>) -> Option<ValidationError> {
        let (min, max) = (self.config.message_min, self.config.review_comment_max);
        let valid = comment.is_some_and(|c| is_valid_message(c, min, max));
        (!valid).then_some(ValidationError::CommentLength { min, max })
    }

    fn check_rating(&self, rating: Option<&Value>) -> Option<ValidationError> {
        (!rating.is_some_and(is_valid_rating)).then_some(ValidationError::InvalidRating)
    }

    fn contact_checks(&self, form: &ContactForm) -> [Option<ValidationError>; 4] {
        [
            self.check_name(form.name()),
            self.check_required_email(form.email()),
            self.check_message(form.message()),
            self.check_phone(form.phone.as_ref()),
        ]
    }

    fn review_checks(&self, form: &ReviewForm) -> [Option<ValidationError>; 4] {
        [
            self.check_name(form.name()),
            self.check_optional_email(form.email.as_ref()),
            self.check_comment(form.comment()),
            self.check_rating(form.rating.as_ref()),
        ]
    }

    /// Validate a contact form and build its sanitized record.
    ///
    /// Fields are checked in order name, email, message, phone and the first
    /// failure is returned.
    pub fn validate_contact(&self, form: &ContactForm) -> Result<ContactSubmission, ValidationError> {
        if let Some(err) = self.contact_checks(form).into_iter().flatten().next() {
            debug!(field = err.field(), error = %err, "Contact form invalid");
            return Err(err);
        }

        Ok(ContactSubmission::new(
            sanitize(form.name().unwrap_or_default(), self.config.name_max),
            sanitize(form.email().unwrap_or_default(), self.config.email_max),
            sanitize(
                field_text(form.phone.as_ref()).unwrap_or_default(),
                self.config.phone_max,
            ),
            sanitize(
                form.message().unwrap_or_default(),
                self.config.contact_message_max,
            ),
            Budget::coerce(form.budget.as_ref()),
        ))
    }

    /// Validate a review form and build its sanitized record.
    ///
    /// Fields are checked in order name, email, comment, rating and the first
    /// failure is returned.
    pub fn validate_review(&self, form: &ReviewForm) -> Result<ReviewSubmission, ValidationError> {
        if let Some(err) = self.review_checks(form).into_iter().flatten().next() {
            debug!(field = err.field(), error = %err, "Review form invalid");
            return Err(err);
        }

        let rating = form
            .rating
            .as_ref()
            .and_then(rating_of)
            .ok_or(ValidationError::InvalidRating)?;

        Ok(ReviewSubmission::new(
            sanitize(form.name().unwrap_or_default(), self.config.name_max),
            sanitize(
                field_text(form.email.as_ref()).unwrap_or_default(),
                self.config.email_max,
            ),
            rating,
            sanitize(
                form.comment().unwrap_or_default(),
                self.config.review_comment_max,
            ),
        ))
    }

    /// Every failing contact field, for inline form feedback.
    pub fn contact_field_errors(&self, form: &ContactForm) -> FieldErrors {
        collect(self.contact_checks(form))
    }

    /// Every failing review field, for inline form feedback.
    pub fn review_field_errors(&self, form: &ReviewForm) -> FieldErrors {
        collect(self.review_checks(form))
    }
}

fn collect(checks: [Option<ValidationError>; 4]) -> FieldErrors {
    checks
        .into_iter()
        .flatten()
        .map(|err| (err.field(), err.to_string()))
        .collect()
}
