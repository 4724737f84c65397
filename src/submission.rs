// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Form payloads, sanitized submission records and where records go.
//!
//! Raw forms are deserialized leniently: every field is optional and kept as
//! raw JSON, so any object parses and the honeypot is always looked at. A
//! field of the wrong type surfaces as a validation error for that field. Records are only built by [`crate::validator::FormValidator`]
//! after validation passes and cannot be modified afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Mutex;
use tracing::info;

/// Raw contact form payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub phone: Option<Value>,
    pub message: Option<Value>,
    pub budget: Option<Value>,
    pub honeypot: Option<Value>,
}

/// Raw review form payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub rating: Option<Value>,
    pub comment: Option<Value>,
    pub honeypot: Option<Value>,
}

/// Whether a honeypot value was filled in.
///
/// Any non-empty string, `true`, non-zero number, array or object counts.
pub fn honeypot_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Text of a submitted field. Non-string values read as absent.
pub fn field_text(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str)
}

impl ContactForm {
    pub fn is_spam(&self) -> bool {
        honeypot_filled(self.honeypot.as_ref())
    }

    pub fn name(&self) -> Option<&str> {
        field_text(self.name.as_ref())
    }

    pub fn email(&self) -> Option<&str> {
        field_text(self.email.as_ref())
    }

    pub fn message(&self) -> Option<&str> {
        field_text(self.message.as_ref())
    }
}

impl ReviewForm {
    pub fn is_spam(&self) -> bool {
        honeypot_filled(self.honeypot.as_ref())
    }

    pub fn name(&self) -> Option<&str> {
        field_text(self.name.as_ref())
    }

    pub fn comment(&self) -> Option<&str> {
        field_text(self.comment.as_ref())
    }
}

/// Project budget bracket selected on the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Budget {
    #[serde(rename = "under-5k")]
    Under5k,
    #[serde(rename = "5k-10k")]
    From5kTo10k,
    #[serde(rename = "10k-25k")]
    From10kTo25k,
    #[serde(rename = "25k-plus")]
    Over25k,
    NotSpecified,
}

impl Budget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Under5k => "under-5k",
            Self::From5kTo10k => "5k-10k",
            Self::From10kTo25k => "10k-25k",
            Self::Over25k => "25k-plus",
            Self::NotSpecified => "not-specified",
        }
    }

    /// Map a submitted value onto a bracket.
    ///
    /// Budget is advisory, so anything outside the known brackets becomes
    /// `NotSpecified` instead of failing the submission.
    pub fn coerce(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("under-5k") => Self::Under5k,
            Some("5k-10k") => Self::From5kTo10k,
            Some("10k-25k") => Self::From10kTo25k,
            Some("25k-plus") => Self::Over25k,
            _ => Self::NotSpecified,
        }
    }
}

/// A validated, sanitized contact message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    name: String,
    email: String,
    phone: String,
    message: String,
    budget: Budget,
    submitted_at: DateTime<Utc>,
}

impl ContactSubmission {
    pub(crate) fn new(
        name: String,
        email: String,
        phone: String,
        message: String,
        budget: Budget,
    ) -> Self {
        Self {
            name,
            email,
            phone,
            message,
            budget,
            submitted_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

/// A validated, sanitized review awaiting moderation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    name: String,
    email: String,
    rating: u8,
    comment: String,
    approved: bool,
    submitted_at: DateTime<Utc>,
}

impl ReviewSubmission {
    pub(crate) fn new(name: String, email: String, rating: u8, comment: String) -> Self {
        Self {
            name,
            email,
            rating,
            comment,
            approved: false,
            submitted_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn approved(&self) -> bool {
        self.approved
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

/// Destination for accepted submissions.
pub trait SubmissionSink: Send + Sync {
    fn record_contact(&self, submission: ContactSubmission);
    fn record_review(&self, submission: ReviewSubmission);
}

/// Sink that writes each record to the log.
#[derive(Debug, Default)]
pub struct LogSink;

impl SubmissionSink for LogSink {
    fn record_contact(&self, submission: ContactSubmission) {
        info!(
            name = %submission.name,
            email = %submission.email,
            phone = %submission.phone,
            budget = submission.budget.as_str(),
            message_len = submission.message.chars().count(),
            submitted_at = %submission.submitted_at.to_rfc3339(),
            "Contact form submission"
        );
    }

    fn record_review(&self, submission: ReviewSubmission) {
        info!(
            name = %submission.name,
            email = %submission.email,
            rating = submission.rating,
            approved = submission.approved,
            comment_len = submission.comment.chars().count(),
            submitted_at = %submission.submitted_at.to_rfc3339(),
            "Review submission"
        );
    }
}

/// Sink that keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    contacts: Mutex<Vec<ContactSubmission>>,
    reviews: Mutex<Vec<ReviewSubmission>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contacts(&self) -> Vec<ContactSubmission> {
        self.contacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn reviews(&self) -> Vec<ReviewSubmission> {
        self.reviews
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl SubmissionSink for MemorySink {
    fn record_contact(&self, submission: ContactSubmission) {
        self.contacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(submission);
    }

    fn record_review(&self, submission: ReviewSubmission) {
        self.reviews
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(submission);
    }
}

/// A review shown on the public site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedReview {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub rating: u8,
    pub comment: String,
    pub date: NaiveDate,
    pub approved: bool,
}

/// Catalogue of reviews known to the site.
#[derive(Debug, Clone, Default)]
pub struct ReviewBoard {
    reviews: Vec<PublishedReview>,
}

impl ReviewBoard {
    pub fn new(reviews: Vec<PublishedReview>) -> Self {
        Self { reviews }
    }

    /// The catalogue the site ships with.
    pub fn seeded() -> Self {
        Self::new(vec![PublishedReview {
            id: 1,
            name: "Sarah Mitchell".to_string(),
            company: Some("Creative Agency Inc.".to_string()),
            rating: 5,
            comment: "The editing work was phenomenal. Every detail was perfect.".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 10, 15).unwrap_or_default(),
            approved: true,
        }])
    }

    /// Reviews that passed moderation.
    pub fn approved(&self) -> Vec<PublishedReview> {
        self.reviews.iter().filter(|r| r.approved).cloned().collect()
    }
}
