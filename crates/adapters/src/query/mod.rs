// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Running-job query adapters
//!
//! The launcher asks how many jobs are already active on its host, so that
//! jobs started before a restart (and not tracked in memory) still count
//! against capacity.

mod cached;
mod shell;

pub use cached::CachedJobQuery;
pub use shell::ShellJobQuery;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeJobQuery;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors from running-job queries
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("running-job query timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("running-job query failed: {0}")]
    Failed(String),
    #[error("running-job query returned unparseable output: {0:?}")]
    BadOutput(String),
}

/// Reports how many jobs are active on a host
#[async_trait]
pub trait RunningJobQuery: Clone + Send + Sync + 'static {
    /// Must return in bounded time; implementations time out rather than hang.
    async fn count_active_jobs(&self, host: &str) -> Result<usize, QueryError>;
}

/// Query for a launcher that is the only source of jobs on its host.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRemoteJobs;

impl NoRemoteJobs {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RunningJobQuery for NoRemoteJobs {
    async fn count_active_jobs(&self, _host: &str) -> Result<usize, QueryError> {
        Ok(0)
    }
}
