// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Hatch launch engine: admission control and agent tracking

mod env;
mod error;
mod launcher;
pub mod metric_names;
mod observer;
mod outcome;
mod status;
mod table;

pub use error::LauncherError;
pub use launcher::{LauncherDeps, LocalAgentLauncher};
pub use observer::{ObserverHandle, SweepReport};
pub use outcome::{LaunchFailure, LaunchOutcome};
pub use status::{JobStatus, LauncherStatus};

#[cfg(test)]
mod test_helpers;
