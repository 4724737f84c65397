// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission pipeline shared by the contact and review endpoints.
//!
//! Every submission goes through the same steps, and a failure at any step
//! skips the rest:
//!
//! 1. Rate limit for the caller, before the body is even parsed
//! 2. Body parse
//! 3. Honeypot, answered exactly like a success
//! 4. Field validation
//! 5. Sanitized record handed to the sink

use crate::config::Config;
use crate::error::{Result, SubmissionError};
use crate::limiter::{RateLimitResult, RateLimiter, Scope};
use crate::metrics::Metrics;
use crate::submission::{ContactForm, ReviewForm, SubmissionSink};
use crate::validator::FormValidator;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How an admitted submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Validated and handed to the sink
    Accepted,
    /// Honeypot was filled; nothing was recorded
    Discarded,
}

/// Runs submissions through rate limiting, spam and field checks.
pub struct SubmissionService {
    limiter: Arc<RateLimiter>,
    validator: FormValidator,
    sink: Arc<dyn SubmissionSink>,
    metrics: Option<Metrics>,
    config: Config,
}

impl SubmissionService {
    pub fn new(
        config: Config,
        limiter: Arc<RateLimiter>,
        sink: Arc<dyn SubmissionSink>,
    ) -> Self {
        Self {
            validator: FormValidator::new(config.validation.clone()),
            limiter,
            sink,
            metrics: None,
            config,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn observe<T>(&self, scope: Scope, result: &Result<T>, outcome: impl Fn(&T) -> &'static str) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        let label = match result {
            Ok(value) => outcome(value),
            Err(SubmissionError::RateLimited { .. }) => "rate_limited",
            Err(SubmissionError::Validation(_)) => "rejected",
            Err(SubmissionError::Malformed(_)) | Err(SubmissionError::Internal(_)) => "failed",
        };
        metrics.observe(scope.as_str(), label);
    }

    async fn admit(&self, scope: Scope, identifier: &str) -> Result<()> {
        let policy = match scope {
            Scope::Contact => &self.config.contact,
            Scope::Review => &self.config.review,
        };

        match self.limiter.check(scope, identifier, policy).await {
            RateLimitResult::Allowed { remaining, .. } => {
                debug!(%scope, identifier, remaining, "Submission admitted");
                Ok(())
            }
            RateLimitResult::Limited {
                reason,
                retry_after,
            } => {
                info!(
                    %scope,
                    identifier,
                    reason = %reason,
                    retry_after_secs = retry_after.as_secs(),
                    "Submission rate limited"
                );
                Err(SubmissionError::RateLimited { scope, retry_after })
            }
        }
    }

    /// Process a raw contact form body from `identifier`.
    pub async fn submit_contact(&self, identifier: &str, body: &[u8]) -> Result<SubmissionOutcome> {
        let result = self.process_contact(identifier, body).await;
        self.observe(Scope::Contact, &result, outcome_label);
        result
    }

    async fn process_contact(&self, identifier: &str, body: &[u8]) -> Result<SubmissionOutcome> {
        self.admit(Scope::Contact, identifier).await?;

        let form: ContactForm = serde_json::from_slice(body)?;
        if form.is_spam() {
            warn!(identifier, "Contact honeypot filled, discarding");
            return Ok(SubmissionOutcome::Discarded);
        }

        let record = self.validator.validate_contact(&form)?;
        self.sink.record_contact(record);
        Ok(SubmissionOutcome::Accepted)
    }

    /// Process a raw review form body from `identifier`.
    pub async fn submit_review(&self, identifier: &str, body: &[u8]) -> Result<SubmissionOutcome> {
        let result = self.process_review(identifier, body).await;
        self.observe(Scope::Review, &result, outcome_label);
        result
    }

    async fn process_review(&self, identifier: &str, body: &[u8]) -> Result<SubmissionOutcome> {
        self.admit(Scope::Review, identifier).await?;

        let form: ReviewForm = serde_json::from_slice(body)?;
        if form.is_spam() {
            warn!(identifier, "Review honeypot filled, discarding");
            return Ok(SubmissionOutcome::Discarded);
        }

        let record = self.validator.validate_review(&form)?;
        self.sink.record_review(record);
        Ok(SubmissionOutcome::Accepted)
    }
}

fn outcome_label(outcome: &SubmissionOutcome) -> &'static str {
    match outcome {
        SubmissionOutcome::Accepted => "accepted",
        SubmissionOutcome::Discarded => "discarded",
    }
}
