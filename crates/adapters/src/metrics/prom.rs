// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prometheus-backed metrics sink.
//!
//! Metric families are registered lazily on first use. A dotted name such as
//! `launch.failed` becomes `hatch_launch_failed_total` for counters and
//! `hatch_launch_start_latency_seconds` for timers; the tag keys of the first
//! sample fix the label set of the family.

use super::MetricsSink;
use parking_lot::Mutex;
use ::prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Buckets for process start latency, in seconds.
pub const START_LATENCY_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0];

const PREFIX: &str = "hatch";

/// Errors from the Prometheus registry
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to register metric: {0}")]
    Registration(#[from] ::prometheus::Error),
    #[error("failed to encode metrics: {0}")]
    Encoding(String),
}

/// Sink exposing launcher metrics in Prometheus format.
///
/// Cheap to clone; clones share the registry and the metric families.
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    counters: Arc<Mutex<HashMap<String, IntCounterVec>>>,
    timers: Arc<Mutex<HashMap<String, HistogramVec>>>,
}

impl Default for PrometheusMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PrometheusMetrics {
    pub fn new() -> Self {
        Self::with_registry(Registry::new())
    }

    /// Register into an existing registry (e.g. one already served over HTTP)
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            counters: Arc::new(Mutex::new(HashMap::new())),
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn gather(&self) -> Vec<::prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Text exposition format, ready to serve on `/metrics`
    pub fn encode_text(&self) -> Result<String, MetricsError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|e| MetricsError::Encoding(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| MetricsError::Encoding(e.to_string()))
    }

    fn counter(&self, name: &str, tags: &[(&str, &str)]) -> Result<IntCounterVec, MetricsError> {
        let mut counters = self.counters.lock();
        if let Some(vec) = counters.get(name) {
            return Ok(vec.clone());
        }
        let vec = IntCounterVec::new(
            Opts::new(
                format!("{}_{}_total", PREFIX, sanitize(name)),
                format!("Count of {}", name),
            ),
            &label_names(tags),
        )?;
        self.registry.register(Box::new(vec.clone()))?;
        counters.insert(name.to_string(), vec.clone());
        Ok(vec)
    }

    fn timer(&self, name: &str, tags: &[(&str, &str)]) -> Result<HistogramVec, MetricsError> {
        let mut timers = self.timers.lock();
        if let Some(vec) = timers.get(name) {
            return Ok(vec.clone());
        }
        let vec = HistogramVec::new(
            HistogramOpts::new(
                format!("{}_{}_seconds", PREFIX, sanitize(name)),
                format!("Duration of {}", name),
            )
            .buckets(START_LATENCY_BUCKETS.to_vec()),
            &label_names(tags),
        )?;
        self.registry.register(Box::new(vec.clone()))?;
        timers.insert(name.to_string(), vec.clone());
        Ok(vec)
    }
}

impl MetricsSink for PrometheusMetrics {
    fn increment(&self, name: &str, tags: &[(&str, &str)]) {
        let result = self.counter(name, tags).and_then(|vec| {
            vec.get_metric_with(&label_map(tags))
                .map(|c| c.inc())
                .map_err(MetricsError::from)
        });
        if let Err(e) = result {
            tracing::warn!(metric = name, error = %e, "dropping counter sample");
        }
    }

    fn record_duration(&self, name: &str, elapsed: Duration, tags: &[(&str, &str)]) {
        let result = self.timer(name, tags).and_then(|vec| {
            vec.get_metric_with(&label_map(tags))
                .map(|h| h.observe(elapsed.as_secs_f64()))
                .map_err(MetricsError::from)
        });
        if let Err(e) = result {
            tracing::warn!(metric = name, error = %e, "dropping timer sample");
        }
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn label_names<'a>(tags: &[(&'a str, &str)]) -> Vec<&'a str> {
    tags.iter().map(|(k, _)| *k).collect()
}

fn label_map<'a>(tags: &[(&'a str, &'a str)]) -> HashMap<&'a str, &'a str> {
    tags.iter().copied().collect()
}

#[cfg(test)]
#[path = "prom_tests.rs"]
mod tests;
