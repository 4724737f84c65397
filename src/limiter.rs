// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window rate limiter for form submissions.
//!
//! Each `(scope, identifier)` pair owns an ordered list of the instants at
//! which attempts were admitted. A check prunes instants that have left the
//! trailing window, then admits the attempt only while fewer than
//! `max_requests` remain.
//!
//! The contact and review forms use separate scopes, so one caller spending
//! its contact budget never touches its review budget.

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitPolicy;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Which form a rate limit bucket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Contact,
    Review,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Review => "review",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed and has been recorded
    Allowed {
        /// Attempts still available in the current window
        remaining: u32,
        /// Time until the oldest recorded attempt leaves the window
        reset_in: Duration,
    },
    /// Request is rate limited and was not recorded
    Limited {
        /// Reason for rate limiting
        reason: RateLimitReason,
        /// Time until an attempt could be admitted again
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Reason for rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitReason {
    /// The window already holds `max_requests` admitted attempts
    WindowExhausted,
    /// The policy has a zero request budget or a zero window
    PolicyDisabled,
}

impl std::fmt::Display for RateLimitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WindowExhausted => write!(f, "Rate limit window exhausted"),
            Self::PolicyDisabled => write!(f, "Rate limit policy admits no requests"),
        }
    }
}

/// Admitted attempts for one bucket, oldest first.
#[derive(Debug, Default)]
struct RateWindow {
    admitted: VecDeque<Instant>,
}

impl RateWindow {
    /// Drop every attempt that is `window` or more in the past.
    fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(&oldest) = self.admitted.front() {
            if now.saturating_duration_since(oldest) >= window {
                self.admitted.pop_front();
            } else {
                break;
            }
        }
    }

    /// Time until the oldest attempt leaves the window.
    fn until_oldest_expires(&self, now: Instant, window: Duration) -> Duration {
        match self.admitted.front() {
            Some(&oldest) => (oldest + window).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    fn newest(&self) -> Option<Instant> {
        self.admitted.back().copied()
    }
}

type BucketKey = (Scope, String);

/// Thread-safe sliding-window rate limiter.
///
/// The outer map lock is held only long enough to find or create a bucket.
/// The prune-compare-record sequence runs under that bucket's own lock, so
/// concurrent checks for one identifier are serialized while different
/// identifiers proceed independently.
#[derive(Debug)]
pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    windows: RwLock<HashMap<BucketKey, Arc<Mutex<RateWindow>>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl RateLimiter {
    /// Create a new rate limiter reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            windows: RwLock::new(HashMap::new()),
        }
    }

    async fn window_for(&self, scope: Scope, identifier: &str) -> Arc<Mutex<RateWindow>> {
        let key = (scope, identifier.to_string());
        {
            let windows = self.windows.read().await;
            if let Some(window) = windows.get(&key) {
                return window.clone();
            }
        }

        let mut windows = self.windows.write().await;
        windows.entry(key).or_default().clone()
    }

    /// Check and record an attempt for `identifier` under `policy`.
    pub async fn check(
        &self,
        scope: Scope,
        identifier: &str,
        policy: &RateLimitPolicy,
    ) -> RateLimitResult {
        if !policy.is_enabled() {
            debug!(%scope, identifier, ?policy, "Rate limit policy disabled");
            return RateLimitResult::Limited {
                reason: RateLimitReason::PolicyDisabled,
                retry_after: Duration::ZERO,
            };
        }

        let bucket = self.window_for(scope, identifier).await;
        let mut window = bucket.lock().await;

        // Read the clock under the bucket lock so recorded instants stay ordered
        let now = self.clock.now();
        let span = policy.window_duration();
        window.prune(now, span);

        let max = policy.max_requests as usize;
        if window.admitted.len() >= max {
            let retry_after = window.until_oldest_expires(now, span);
            debug!(%scope, identifier, ?retry_after, "Rate limit exceeded");
            return RateLimitResult::Limited {
                reason: RateLimitReason::WindowExhausted,
                retry_after,
            };
        }

        window.admitted.push_back(now);
        RateLimitResult::Allowed {
            remaining: (max - window.admitted.len()) as u32,
            reset_in: window.until_oldest_expires(now, span),
        }
    }

    /// Drop buckets whose newest attempt is older than `max_window`.
    ///
    /// Buckets currently held by an in-flight check are kept. Returns the
    /// number of buckets removed.
    pub async fn cleanup(&self, max_window: Duration) -> usize {
        let now = self.clock.now();
        let mut windows = self.windows.write().await;
        let before = windows.len();

        windows.retain(|_, bucket| {
            if Arc::strong_count(bucket) > 1 {
                return true;
            }
            match bucket.try_lock() {
                Ok(window) => match window.newest() {
                    Some(newest) => now.saturating_duration_since(newest) < max_window,
                    None => false,
                },
                Err(_) => true,
            }
        });

        let removed = before - windows.len();
        if removed > 0 {
            debug!(removed, remaining = windows.len(), "Swept stale rate windows");
        }
        removed
    }

    /// Number of buckets currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.windows.read().await.len()
    }
}
