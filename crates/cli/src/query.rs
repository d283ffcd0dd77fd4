// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Running-job query selected by the `[query]` config section

use async_trait::async_trait;
use hatch_adapters::{
    CachedJobQuery, NoRemoteJobs, QueryError, RunningJobQuery, ShellJobQuery, TracedQuery,
};
use hatch_core::QueryConfig;

#[derive(Clone)]
pub enum HostJobQuery {
    /// No `command` configured: this launcher is the only source of jobs
    Standalone(NoRemoteJobs),
    Shell(CachedJobQuery<TracedQuery<ShellJobQuery>>),
}

impl HostJobQuery {
    pub fn from_config(config: &QueryConfig) -> Self {
        match &config.command {
            None => HostJobQuery::Standalone(NoRemoteJobs::new()),
            Some(command) => HostJobQuery::Shell(CachedJobQuery::new(
                TracedQuery::new(ShellJobQuery::new(command.clone(), config.timeout)),
                config.cache_ttl,
            )),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            HostJobQuery::Standalone(_) => "standalone",
            HostJobQuery::Shell(_) => "shell",
        }
    }
}

#[async_trait]
impl RunningJobQuery for HostJobQuery {
    async fn count_active_jobs(&self, host: &str) -> Result<usize, QueryError> {
        match self {
            HostJobQuery::Standalone(q) => q.count_active_jobs(host).await,
            HostJobQuery::Shell(q) => q.count_active_jobs(host).await,
        }
    }
}
