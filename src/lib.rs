// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Studio Intake
//!
//! Submission backend for the studio portfolio site's contact and review
//! forms:
//!
//! - Per-caller sliding-window rate limiting (5 contact messages per minute,
//!   3 reviews per day by default), with separate budgets per form
//! - Honeypot spam detection that answers exactly like a success
//! - Field validation and plain-text sanitization
//! - Listing of moderated reviews

pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod service;
pub mod submission;
pub mod validator;

pub use config::{Config, RateLimitPolicy};
pub use error::SubmissionError;
pub use limiter::{RateLimitResult, RateLimiter, Scope};
pub use service::{SubmissionOutcome, SubmissionService};
pub use validator::{FormValidator, ValidationError};
