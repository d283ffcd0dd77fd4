// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use hatch_engine::{LaunchFailure, LaunchOutcome};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// JSON form of one launch outcome
#[derive(Debug, Serialize)]
pub struct OutcomeRecord<'a> {
    pub job_id: &'a str,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<'a> OutcomeRecord<'a> {
    pub fn new(job_id: &'a str, outcome: &LaunchOutcome) -> Self {
        let mut record = Self {
            job_id,
            outcome: outcome.label(),
            current_count: None,
            max: None,
            cause: None,
            message: None,
        };
        match outcome {
            LaunchOutcome::Admitted { .. } => {}
            LaunchOutcome::RejectedCapacity { current_count, max } => {
                record.current_count = Some(*current_count);
                record.max = Some(*max);
            }
            LaunchOutcome::RejectedInvalidConfig { reason } => {
                record.message = Some(reason.clone());
            }
            LaunchOutcome::LaunchFailed { cause, .. } => {
                record.cause = Some(cause.label());
                record.message = Some(failure_message(cause));
            }
        }
        record
    }
}

/// One text line per outcome, always naming the job
pub fn outcome_line(job_id: &str, outcome: &LaunchOutcome) -> String {
    match outcome {
        LaunchOutcome::Admitted { .. } => format!("admitted {}", job_id),
        LaunchOutcome::RejectedCapacity { current_count, max } => {
            format!("rejected {}: capacity {}/{}", job_id, current_count, max)
        }
        LaunchOutcome::RejectedInvalidConfig { reason } => {
            format!("rejected {:?}: {}", job_id, reason)
        }
        LaunchOutcome::LaunchFailed { cause, .. } => {
            format!("failed {}: {}", job_id, failure_message(cause))
        }
    }
}

fn failure_message(cause: &LaunchFailure) -> String {
    cause.to_string()
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
