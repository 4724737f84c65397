// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for form abuse simulation.
//!
//! Drives the submission pipeline with scripted traffic patterns on a
//! manual clock and tallies how each request ended.

pub mod attacks;
pub mod generators;
pub mod metrics;
