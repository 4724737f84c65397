// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the submission intake service.
//!
//! Defaults match the limits the site has always advertised: five contact
//! messages per minute and three reviews per day for each caller.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the intake service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limit applied to the contact form
    #[serde(default = "default_contact_policy")]
    pub contact: RateLimitPolicy,

    /// Rate limit applied to the review form
    #[serde(default = "default_review_policy")]
    pub review: RateLimitPolicy,

    /// Field bounds shared by both forms
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Interval between stale rate window sweeps in seconds (default: 60)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

/// A sliding-window admission policy.
///
/// A policy with `max_requests == 0` or `window_ms == 0` admits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Accepted attempts allowed inside one window
    pub max_requests: u32,

    /// Trailing window length in milliseconds
    pub window_ms: u64,
}

/// Field bounds for submitted forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum trimmed name length (default: 2)
    #[serde(default = "default_name_min")]
    pub name_min: usize,

    /// Maximum trimmed name length (default: 100)
    #[serde(default = "default_name_max")]
    pub name_max: usize,

    /// Minimum trimmed message/comment length (default: 10)
    #[serde(default = "default_message_min")]
    pub message_min: usize,

    /// Maximum contact message length (default: 5000)
    #[serde(default = "default_contact_message_max")]
    pub contact_message_max: usize,

    /// Maximum review comment length (default: 1000)
    #[serde(default = "default_review_comment_max")]
    pub review_comment_max: usize,

    /// Length emails are truncated to when sanitized (default: 254)
    #[serde(default = "default_email_max")]
    pub email_max: usize,

    /// Length phone numbers are truncated to when sanitized (default: 20)
    #[serde(default = "default_phone_max")]
    pub phone_max: usize,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_contact_policy() -> RateLimitPolicy {
    RateLimitPolicy {
        max_requests: 5,
        window_ms: 60_000,
    }
}

fn default_review_policy() -> RateLimitPolicy {
    RateLimitPolicy {
        max_requests: 3,
        window_ms: 86_400_000, // 24h
    }
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_name_min() -> usize {
    2
}

fn default_name_max() -> usize {
    100
}

fn default_message_min() -> usize {
    10
}

fn default_contact_message_max() -> usize {
    5000
}

fn default_review_comment_max() -> usize {
    1000
}

fn default_email_max() -> usize {
    254
}

fn default_phone_max() -> usize {
    20
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            contact: default_contact_policy(),
            review: default_review_policy(),
            validation: ValidationConfig::default(),
            metrics: MetricsConfig::default(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            name_min: default_name_min(),
            name_max: default_name_max(),
            message_min: default_message_min(),
            contact_message_max: default_contact_message_max(),
            review_comment_max: default_review_comment_max(),
            email_max: default_email_max(),
            phone_max: default_phone_max(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitPolicy {
    /// Get the window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Whether this policy can ever admit a request.
    pub fn is_enabled(&self) -> bool {
        self.max_requests > 0 && self.window_ms > 0
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Config {
    /// Build a configuration from the defaults overlaid with environment variables.
    ///
    /// - `BIND_ADDR`: Server bind address
    /// - `CONTACT_MAX_REQUESTS` / `CONTACT_WINDOW_MS`: contact form policy
    /// - `REVIEW_MAX_REQUESTS` / `REVIEW_WINDOW_MS`: review form policy
    /// - `CLEANUP_INTERVAL_SECS`: stale window sweep interval
    /// - `METRICS_ENABLED`: expose the Prometheus endpoint
    ///
    /// Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            contact: RateLimitPolicy {
                max_requests: parse_var(&lookup, "CONTACT_MAX_REQUESTS")
                    .unwrap_or(defaults.contact.max_requests),
                window_ms: parse_var(&lookup, "CONTACT_WINDOW_MS")
                    .unwrap_or(defaults.contact.window_ms),
            },
            review: RateLimitPolicy {
                max_requests: parse_var(&lookup, "REVIEW_MAX_REQUESTS")
                    .unwrap_or(defaults.review.max_requests),
                window_ms: parse_var(&lookup, "REVIEW_WINDOW_MS")
                    .unwrap_or(defaults.review.window_ms),
            },
            cleanup_interval_secs: parse_var(&lookup, "CLEANUP_INTERVAL_SECS")
                .unwrap_or(defaults.cleanup_interval_secs),
            metrics: MetricsConfig {
                enabled: parse_var(&lookup, "METRICS_ENABLED").unwrap_or(defaults.metrics.enabled),
                path: defaults.metrics.path,
            },
            validation: defaults.validation,
        }
    }

    /// Longest window of any configured policy.
    pub fn longest_window(&self) -> Duration {
        self.contact
            .window_duration()
            .max(self.review.window_duration())
    }
}
