// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-in-time view of the launcher for health reporting

use hatch_core::{format_elapsed, JobId};
use std::fmt;
use std::time::Duration;

/// One tracked agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub job_id: JobId,
    pub pid: Option<u32>,
    pub age: Duration,
}

/// Snapshot returned by `LocalAgentLauncher::status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherStatus {
    pub max_jobs_per_host: usize,
    /// Agents started and not yet seen exiting
    pub running: usize,
    /// Slots held by launches whose process start is in flight
    pub reserved: usize,
    /// Running agents, ordered by job id
    pub jobs: Vec<JobStatus>,
}

impl LauncherStatus {
    /// Local slots still free, ignoring jobs reported by the running-job query
    pub fn available(&self) -> usize {
        self.max_jobs_per_host
            .saturating_sub(self.running + self.reserved)
    }
}

impl fmt::Display for LauncherStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} running, {} starting, {} max",
            self.running, self.reserved, self.max_jobs_per_host
        )?;
        for job in &self.jobs {
            let pid = job
                .pid
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());
            write!(f, "\n  {}  pid {}  {}", job.job_id, pid, format_elapsed(job.age))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
