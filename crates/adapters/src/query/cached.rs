// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Short-lived cache in front of a running-job query

use super::{QueryError, RunningJobQuery};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Caches successful counts per host for `ttl`.
///
/// A burst of launches shares one query: concurrent misses for the same cache
/// wait on a single refresh instead of each hitting the backend. Errors are
/// never cached. A zero TTL disables caching.
#[derive(Clone)]
pub struct CachedJobQuery<Q> {
    inner: Q,
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, (Instant, usize)>>>,
    refresh: Arc<tokio::sync::Mutex<()>>,
}

impl<Q> CachedJobQuery<Q> {
    /// `HATCH_QUERY_CACHE_MS` overrides `ttl` when set.
    pub fn new(inner: Q, ttl: Duration) -> Self {
        Self {
            inner,
            ttl: crate::env::query_cache_ms().unwrap_or(ttl),
            entries: Arc::new(Mutex::new(HashMap::new())),
            refresh: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    fn fresh(&self, host: &str) -> Option<usize> {
        let entries = self.entries.lock();
        let (at, count) = entries.get(host)?;
        (at.elapsed() < self.ttl).then_some(*count)
    }
}

#[async_trait]
impl<Q: RunningJobQuery> RunningJobQuery for CachedJobQuery<Q> {
    async fn count_active_jobs(&self, host: &str) -> Result<usize, QueryError> {
        if self.ttl.is_zero() {
            return self.inner.count_active_jobs(host).await;
        }
        if let Some(count) = self.fresh(host) {
            return Ok(count);
        }

        let _refresh = self.refresh.lock().await;
        // Another caller may have refreshed while we waited
        if let Some(count) = self.fresh(host) {
            return Ok(count);
        }
        let count = self.inner.count_active_jobs(host).await?;
        self.entries
            .lock()
            .insert(host.to_string(), (Instant::now(), count));
        Ok(count)
    }
}

#[cfg(test)]
#[path = "cached_tests.rs"]
mod tests;
