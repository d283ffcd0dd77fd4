// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake running-job query for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{QueryError, RunningJobQuery};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct FakeQueryState {
    count: usize,
    fail: Option<String>,
    delay: Option<Duration>,
    hosts: Vec<String>,
}

/// Fake query returning a settable count and recording queried hosts
#[derive(Clone)]
pub struct FakeJobQuery {
    inner: Arc<Mutex<FakeQueryState>>,
}

impl Default for FakeJobQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeJobQuery {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeQueryState {
                count: 0,
                fail: None,
                delay: None,
                hosts: Vec::new(),
            })),
        }
    }

    pub fn set_count(&self, count: usize) {
        self.inner.lock().count = count;
    }

    /// Fail every query with `message` until cleared with `None`
    pub fn set_failure(&self, message: Option<&str>) {
        self.inner.lock().fail = message.map(str::to_string);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.inner.lock().delay = Some(delay);
    }

    /// Hosts queried so far, in call order
    pub fn hosts(&self) -> Vec<String> {
        self.inner.lock().hosts.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().hosts.len()
    }
}

#[async_trait]
impl RunningJobQuery for FakeJobQuery {
    async fn count_active_jobs(&self, host: &str) -> Result<usize, QueryError> {
        let delay = {
            let mut inner = self.inner.lock();
            inner.hosts.push(host.to_string());
            inner.delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let inner = self.inner.lock();
        match &inner.fail {
            Some(message) => Err(QueryError::Failed(message.clone())),
            None => Ok(inner.count),
        }
    }
}
