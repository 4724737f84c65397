// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the submission intake service.

use crate::error::{ErrorResponse, GENERIC_FAILURE};
use crate::metrics::Metrics;
use crate::service::{SubmissionOutcome, SubmissionService};
use crate::submission::{PublishedReview, ReviewBoard};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error};

/// Identifier used when the caller's address is unknown.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Shared application state.
pub struct AppState {
    pub service: SubmissionService,
    pub reviews: ReviewBoard,
    pub metrics: Option<Metrics>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Successful submission response.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

const CONTACT_CONFIRMATION: &str =
    "Your message has been sent successfully. I'll get back to you soon!";
const REVIEW_CONFIRMATION: &str = "Thank you for your review! It will appear after approval.";

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let metrics_path = state
        .metrics
        .as_ref()
        .map(|_| state.service.config().metrics.path.clone());

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/contact", post(submit_contact))
        .route("/api/reviews", post(submit_review).get(list_reviews));

    if let Some(path) = metrics_path {
        app = app.route(&path, get(metrics));
    }

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Caller identity for rate limiting: the first `X-Forwarded-For` hop.
pub fn client_identifier(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

fn success(outcome: SubmissionOutcome, message: &'static str) -> Response {
    let message = match outcome {
        SubmissionOutcome::Accepted => Some(message),
        // Spam gets the bare success shape the browser form also accepts
        SubmissionOutcome::Discarded => None,
    };
    (
        StatusCode::OK,
        Json(SubmitResponse {
            success: true,
            message,
        }),
    )
        .into_response()
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "studio-intake",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Accept a contact form submission.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let identifier = client_identifier(&headers);
    debug!(identifier = %identifier, bytes = body.len(), "Processing contact submission");

    match state.service.submit_contact(&identifier, &body).await {
        Ok(outcome) => success(outcome, CONTACT_CONFIRMATION),
        Err(err) => err.into_response(),
    }
}

/// Accept a review submission. Reviews stay hidden until approved.
pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let identifier = client_identifier(&headers);
    debug!(identifier = %identifier, bytes = body.len(), "Processing review submission");

    match state.service.submit_review(&identifier, &body).await {
        Ok(outcome) => success(outcome, REVIEW_CONFIRMATION),
        Err(err) => err.into_response(),
    }
}

/// List approved reviews.
pub async fn list_reviews(State(state): State<Arc<AppState>>) -> Json<Vec<PublishedReview>> {
    Json(state.reviews.approved())
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    let Some(metrics) = &state.metrics else {
        return StatusCode::NOT_FOUND.into_response();
    };

    metrics.set_tracked_windows(state.service.limiter().tracked_keys().await);
    match metrics.render() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "Failed to render metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: GENERIC_FAILURE.to_string(),
                    field: None,
                }),
            )
                .into_response()
        }
    }
}
