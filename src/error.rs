// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for submission handling and their HTTP rendering.

use crate::limiter::Scope;
use crate::validator::ValidationError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

/// Message returned for any failure the caller cannot act on.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

/// Reasons a submission was not accepted.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{scope} rate limit exceeded")]
    RateLimited { scope: Scope, retry_after: Duration },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Malformed request body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl SubmissionError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Malformed(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the caller. Internal detail never appears here.
    pub fn public_message(&self) -> String {
        match self {
            Self::RateLimited {
                scope: Scope::Contact,
                ..
            } => "Too many requests. Please try again later.".to_string(),
            Self::RateLimited {
                scope: Scope::Review,
                ..
            } => "Review limit exceeded. Try again tomorrow.".to_string(),
            Self::Validation(err) => err.to_string(),
            Self::Malformed(_) | Self::Internal(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.public_message(),
            field: match &self {
                Self::Validation(err) => Some(err.field()),
                _ => None,
            },
        });

        match self {
            Self::RateLimited { retry_after, .. } => {
                // Round up so clients never retry early
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                (status, [(header::RETRY_AFTER, secs.to_string())], body).into_response()
            }
            Self::Malformed(_) | Self::Internal(_) => {
                error!(error = %self, "Submission failed");
                (status, body).into_response()
            }
            Self::Validation(_) => (status, body).into_response(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SubmissionError>;
