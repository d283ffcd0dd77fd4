// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for launcher operations other than `launch`

use hatch_adapters::ProcessError;
use hatch_core::JobId;
use thiserror::Error;

/// Errors from `terminate` and other per-job operations.
///
/// `launch` never returns these; its results are [`LaunchOutcome`](crate::LaunchOutcome) values.
#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("job {0} is not tracked by this launcher")]
    NotTracked(JobId),
    #[error(transparent)]
    Process(#[from] ProcessError),
}
