// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metric names and tag keys emitted by the launcher

pub const ADMITTED: &str = "launch.admitted";
pub const REJECTED_CAPACITY: &str = "launch.rejected.capacity";
pub const REJECTED_INVALID: &str = "launch.rejected.invalid";
pub const FAILED: &str = "launch.failed";
pub const START_LATENCY: &str = "launch.start.latency";
pub const PROCESS_EXITED: &str = "launch.process.exited";
pub const OBSERVER_FAILED: &str = "launch.observer.failed";
pub const TRACKING_EXPIRED: &str = "launch.tracking.expired";

pub const TAG_REASON: &str = "reason";
pub const TAG_CAUSE: &str = "cause";
pub const TAG_OUTCOME: &str = "outcome";
pub const TAG_EXIT_CODE: &str = "exit_code";

/// `reason` values for [`REJECTED_CAPACITY`]
pub const REASON_CAPACITY: &str = "capacity";
pub const REASON_QUERY_FAILED: &str = "query_failed";
pub const REASON_DRAIN: &str = "drain";
