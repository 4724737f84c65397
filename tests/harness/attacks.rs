// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Abuse patterns for security testing.

use std::time::Duration;

/// Which endpoint the traffic targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Contact,
    Review,
}

/// Abuse pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// Simulated time between consecutive requests
    pub interval: Duration,
    /// Number of distinct callers, used round robin
    pub unique_clients: usize,
    /// Target form
    pub form: Form,
    /// Share of requests with the honeypot filled (0.0-1.0)
    pub spam_ratio: f64,
    /// Share of requests with broken fields (0.0-1.0)
    pub invalid_ratio: f64,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            interval: Duration::from_millis(100),
            unique_clients: 1,
            form: Form::Contact,
            spam_ratio: 0.0,
            invalid_ratio: 0.0,
        }
    }
}

/// Predefined abuse patterns.
impl AttackConfig {
    /// One caller hammering the contact form.
    pub fn single_client_flood() -> Self {
        Self {
            total_requests: 100,
            interval: Duration::from_millis(100),
            ..Default::default()
        }
    }

    /// Many callers, each at a moderate pace.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 500,
            interval: Duration::from_millis(100),
            unique_clients: 50,
            ..Default::default()
        }
    }

    /// A bot that fills every field, honeypot included.
    pub fn honeypot_bot() -> Self {
        Self {
            total_requests: 40,
            unique_clients: 40,
            spam_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Junk payloads from many callers.
    pub fn garbage_fields() -> Self {
        Self {
            total_requests: 60,
            unique_clients: 60,
            invalid_ratio: 1.0,
            ..Default::default()
        }
    }

    /// One caller staying just under five messages a minute.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 30,
            interval: Duration::from_secs(13),
            ..Default::default()
        }
    }

    /// One caller posting a review every few minutes.
    pub fn review_flood() -> Self {
        Self {
            total_requests: 20,
            interval: Duration::from_secs(180),
            form: Form::Review,
            ..Default::default()
        }
    }

    /// Simulated span covered by the whole run.
    pub fn expected_duration(&self) -> Duration {
        self.interval * self.total_requests.saturating_sub(1) as u32
    }
}

/// Simple deterministic "random" based on index and ratio.
pub fn rand_bool(ratio: f64, index: usize) -> bool {
    if ratio >= 1.0 {
        true
    } else if ratio <= 0.0 {
        false
    } else {
        (index as f64 * 0.618033988749895) % 1.0 < ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rand_bool_extremes() {
        assert!((0..10).all(|i| rand_bool(1.0, i)));
        assert!((0..10).all(|i| !rand_bool(0.0, i)));
    }

    #[test]
    fn test_expected_duration() {
        assert_eq!(
            AttackConfig::slow_drip().expected_duration(),
            Duration::from_secs(13 * 29)
        );
    }
}
