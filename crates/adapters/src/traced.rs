// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::process::{ProcessError, ProcessExecutor, ProcessHandle};
use crate::query::{QueryError, RunningJobQuery};
use async_trait::async_trait;
use hatch_core::AgentCommand;
use tracing::Instrument;

/// Wrapper that adds tracing to any ProcessExecutor
#[derive(Clone)]
pub struct TracedExecutor<P> {
    inner: P,
}

impl<P> TracedExecutor<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: ProcessExecutor> ProcessExecutor for TracedExecutor<P> {
    type Handle = P::Handle;

    async fn start(
        &self,
        name: &str,
        command: &AgentCommand,
    ) -> Result<Self::Handle, ProcessError> {
        async {
            tracing::info!(
                args = command.args.len(),
                env_count = command.env.len(),
                "starting"
            );
            let start = std::time::Instant::now();
            let result = self.inner.start(name, command).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(handle) => tracing::info!(pid = ?handle.pid(), elapsed_ms, "process started"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "start failed"),
            }
            result
        }
        .instrument(tracing::info_span!(
            "process.start",
            job = name,
            program = %command.program.display()
        ))
        .await
    }
}

/// Wrapper that adds tracing to any RunningJobQuery
#[derive(Clone)]
pub struct TracedQuery<Q> {
    inner: Q,
}

impl<Q> TracedQuery<Q> {
    pub fn new(inner: Q) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<Q: RunningJobQuery> RunningJobQuery for TracedQuery<Q> {
    async fn count_active_jobs(&self, host: &str) -> Result<usize, QueryError> {
        let start = std::time::Instant::now();
        let result = self.inner.count_active_jobs(host).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        tracing::info_span!("query.count", host).in_scope(|| match &result {
            Ok(count) => tracing::debug!(count, elapsed_ms, "counted active jobs"),
            Err(e) => tracing::warn!(elapsed_ms, error = %e, "count failed"),
        });
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
