// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Results of a launch attempt

use hatch_adapters::ProcessError;
use hatch_core::{format_elapsed, JobId};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result of one call to `launch`. Exactly one variant per call.
#[derive(Debug)]
pub enum LaunchOutcome {
    /// The agent process started and is tracked
    Admitted { job_id: JobId },
    /// The host is full; try later. Nothing was started or reserved.
    RejectedCapacity { current_count: usize, max: usize },
    /// The request cannot be expressed as an agent command line
    RejectedInvalidConfig { reason: String },
    /// The launch was attempted (or refused as a duplicate) and did not start
    LaunchFailed { job_id: JobId, cause: LaunchFailure },
}

/// Why an admitted launch did not produce a running agent
#[derive(Debug, Error)]
pub enum LaunchFailure {
    #[error("job is already tracked")]
    DuplicateJob,
    #[error(transparent)]
    Start(#[from] ProcessError),
    #[error("process start timed out after {}", format_elapsed(*.0))]
    Timeout(Duration),
}

impl LaunchFailure {
    /// Low-cardinality label for metrics
    pub fn label(&self) -> &'static str {
        match self {
            LaunchFailure::DuplicateJob => "duplicate",
            LaunchFailure::Start(_) => "start",
            LaunchFailure::Timeout(_) => "timeout",
        }
    }
}

impl LaunchOutcome {
    pub fn is_admitted(&self) -> bool {
        matches!(self, LaunchOutcome::Admitted { .. })
    }

    /// Low-cardinality label for metrics and CLI output
    pub fn label(&self) -> &'static str {
        match self {
            LaunchOutcome::Admitted { .. } => "admitted",
            LaunchOutcome::RejectedCapacity { .. } => "rejected_capacity",
            LaunchOutcome::RejectedInvalidConfig { .. } => "rejected_invalid",
            LaunchOutcome::LaunchFailed { .. } => "failed",
        }
    }
}

impl fmt::Display for LaunchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchOutcome::Admitted { job_id } => write!(f, "admitted {}", job_id),
            LaunchOutcome::RejectedCapacity { current_count, max } => {
                write!(f, "rejected: capacity {}/{}", current_count, max)
            }
            LaunchOutcome::RejectedInvalidConfig { reason } => write!(f, "rejected: {}", reason),
            LaunchOutcome::LaunchFailed { job_id, cause } => {
                write!(f, "failed {}: {}", job_id, cause)
            }
        }
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
