// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metrics sinks

mod prom;

pub use prom::{MetricsError, PrometheusMetrics};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMetrics, MetricCall};

use std::time::Duration;

/// Records counters and timers.
///
/// Recording never fails into the caller: a sink that cannot record logs and
/// drops the sample.
pub trait MetricsSink: Clone + Send + Sync + 'static {
    fn increment(&self, name: &str, tags: &[(&str, &str)]);

    fn record_duration(&self, name: &str, elapsed: Duration, tags: &[(&str, &str)]);
}

/// Sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpMetrics;

impl NoOpMetrics {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsSink for NoOpMetrics {
    fn increment(&self, _name: &str, _tags: &[(&str, &str)]) {}

    fn record_duration(&self, _name: &str, _elapsed: Duration, _tags: &[(&str, &str)]) {}
}
