// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake metrics sink for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::MetricsSink;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Recorded metric sample
#[derive(Debug, Clone, PartialEq)]
pub enum MetricCall {
    Increment {
        name: String,
        tags: Vec<(String, String)>,
    },
    Duration {
        name: String,
        elapsed: Duration,
        tags: Vec<(String, String)>,
    },
}

impl MetricCall {
    pub fn name(&self) -> &str {
        match self {
            MetricCall::Increment { name, .. } | MetricCall::Duration { name, .. } => name,
        }
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        let tags = match self {
            MetricCall::Increment { tags, .. } | MetricCall::Duration { tags, .. } => tags,
        };
        tags.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Records every sample in memory
#[derive(Clone, Default)]
pub struct FakeMetrics {
    calls: Arc<Mutex<Vec<MetricCall>>>,
}

impl FakeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<MetricCall> {
        self.calls.lock().clone()
    }

    /// Number of increments recorded under `name`
    pub fn count(&self, name: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, MetricCall::Increment { .. }) && c.name() == name)
            .count()
    }

    /// Number of increments under `name` carrying tag `key=value`
    pub fn count_tagged(&self, name: &str, key: &str, value: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| {
                matches!(c, MetricCall::Increment { .. })
                    && c.name() == name
                    && c.tag(key) == Some(value)
            })
            .count()
    }

    /// Number of timer samples recorded under `name`
    pub fn timings(&self, name: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, MetricCall::Duration { .. }) && c.name() == name)
            .count()
    }
}

fn owned(tags: &[(&str, &str)]) -> Vec<(String, String)> {
    tags.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl MetricsSink for FakeMetrics {
    fn increment(&self, name: &str, tags: &[(&str, &str)]) {
        self.calls.lock().push(MetricCall::Increment {
            name: name.to_string(),
            tags: owned(tags),
        });
    }

    fn record_duration(&self, name: &str, elapsed: Duration, tags: &[(&str, &str)]) {
        self.calls.lock().push(MetricCall::Duration {
            name: name.to_string(),
            elapsed,
            tags: owned(tags),
        });
    }
}
