// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for submission outcomes.

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Submission metrics, registered on a private registry.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    submissions: IntCounterVec,
    tracked_windows: IntGauge,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let submissions = IntCounterVec::new(
            Opts::new(
                "intake_submissions_total",
                "Form submissions by form and outcome",
            ),
            &["form", "outcome"],
        )?;
        let tracked_windows = IntGauge::new(
            "intake_rate_windows",
            "Rate limit windows currently held in memory",
        )?;

        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(tracked_windows.clone()))?;

        Ok(Self {
            registry,
            submissions,
            tracked_windows,
        })
    }

    /// Count one submission for `form` ending in `outcome`.
    pub fn observe(&self, form: &str, outcome: &str) {
        self.submissions.with_label_values(&[form, outcome]).inc();
    }

    pub fn submissions(&self, form: &str, outcome: &str) -> u64 {
        self.submissions.with_label_values(&[form, outcome]).get()
    }

    pub fn set_tracked_windows(&self, count: usize) {
        self.tracked_windows.set(count as i64);
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}
