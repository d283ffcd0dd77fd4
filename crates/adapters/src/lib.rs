// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the launcher's external collaborators: OS processes, the
//! running-job query and the metrics sink.

mod env;
pub mod metrics;
pub mod process;
pub mod query;
pub mod subprocess;
pub mod traced;

pub use metrics::{MetricsError, MetricsSink, NoOpMetrics, PrometheusMetrics};
pub use process::{
    LocalProcessExecutor, LocalProcessHandle, ProcessError, ProcessExecutor, ProcessExit,
    ProcessHandle,
};
pub use query::{CachedJobQuery, NoRemoteJobs, QueryError, RunningJobQuery, ShellJobQuery};
pub use traced::{TracedExecutor, TracedQuery};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use metrics::{FakeMetrics, MetricCall};
#[cfg(any(test, feature = "test-support"))]
pub use process::{FakeProcessExecutor, FakeProcessHandle, StartCall};
#[cfg(any(test, feature = "test-support"))]
pub use query::FakeJobQuery;
