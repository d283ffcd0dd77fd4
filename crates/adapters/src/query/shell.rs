// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Running-job query that shells out to an operator-provided command

use super::{QueryError, RunningJobQuery};
use crate::subprocess::{run_with_timeout, SubprocessError};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;

/// Environment variable carrying the host address to the query command.
pub const HOST_ENV: &str = "HATCH_HOST";

/// Runs `<shell> -c <command>` and reads a job count from its stdout.
///
/// The command sees the host in `HATCH_HOST` and must print a single
/// non-negative integer and exit 0.
#[derive(Clone, Debug)]
pub struct ShellJobQuery {
    command: String,
    shell: String,
    timeout: Duration,
}

impl ShellJobQuery {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            shell: crate::env::query_shell(),
            timeout,
        }
    }
}

#[async_trait]
impl RunningJobQuery for ShellJobQuery {
    async fn count_active_jobs(&self, host: &str) -> Result<usize, QueryError> {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(&self.command).env(HOST_ENV, host);

        let output = run_with_timeout(cmd, self.timeout, "running-job query")
            .await
            .map_err(|e| match e {
                SubprocessError::Timeout { timeout, .. } => QueryError::Timeout(timeout),
                other => QueryError::Failed(other.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(QueryError::Failed(format!(
                "exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let trimmed = stdout.trim();
        trimmed
            .parse::<usize>()
            .map_err(|_| QueryError::BadOutput(trimmed.to_string()))
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
