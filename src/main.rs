// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Studio Intake Service
//!
//! Accepts contact and review submissions from the portfolio site.
//!
//! ## Endpoints
//!
//! - `POST /api/contact`: contact form
//! - `POST /api/reviews`: review form (held for moderation)
//! - `GET /api/reviews`: approved reviews
//! - `GET /health`, `GET /healthz`: liveness
//! - `GET /metrics`: Prometheus metrics (when enabled)
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `CONTACT_MAX_REQUESTS` / `CONTACT_WINDOW_MS`: contact limit (default: 5 per 60000 ms)
//! - `REVIEW_MAX_REQUESTS` / `REVIEW_WINDOW_MS`: review limit (default: 3 per 86400000 ms)
//! - `CLEANUP_INTERVAL_SECS`: stale rate window sweep interval (default: 60)
//! - `METRICS_ENABLED`: expose `/metrics` (default: true)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use studio_intake::{
    config::Config,
    handlers::{router, AppState},
    limiter::RateLimiter,
    metrics::Metrics,
    service::SubmissionService,
    submission::{LogSink, ReviewBoard},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env();
    info!(
        bind_addr = %config.bind_addr,
        contact_max_requests = config.contact.max_requests,
        contact_window_ms = config.contact.window_ms,
        review_max_requests = config.review.max_requests,
        review_window_ms = config.review.window_ms,
        "Starting studio intake"
    );

    let metrics = if config.metrics.enabled {
        Some(Metrics::new()?)
    } else {
        None
    };

    let limiter = Arc::new(RateLimiter::default());
    let mut service = SubmissionService::new(config.clone(), limiter.clone(), Arc::new(LogSink));
    if let Some(metrics) = &metrics {
        service = service.with_metrics(metrics.clone());
    }

    let state = Arc::new(AppState {
        service,
        reviews: ReviewBoard::seeded(),
        metrics,
    });

    // Sweep windows nobody has touched for longer than any policy looks back
    let max_window = config.longest_window();
    let sweep_every = Duration::from_secs(config.cleanup_interval_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_every);
        loop {
            interval.tick().await;
            limiter.cleanup(max_window).await;
        }
    });

    let app = router(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
