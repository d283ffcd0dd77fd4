// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hatch_core::JobId;
use std::time::Duration;

#[test]
fn text_lines() {
    let admitted = LaunchOutcome::Admitted {
        job_id: JobId::new("job-1"),
    };
    assert_eq!(outcome_line("job-1", &admitted), "admitted job-1");

    let full = LaunchOutcome::RejectedCapacity {
        current_count: 2,
        max: 2,
    };
    assert_eq!(outcome_line("job-3", &full), "rejected job-3: capacity 2/2");

    let failed = LaunchOutcome::LaunchFailed {
        job_id: JobId::new("job-4"),
        cause: LaunchFailure::Timeout(Duration::from_secs(30)),
    };
    assert_eq!(
        outcome_line("job-4", &failed),
        "failed job-4: process start timed out after 30s"
    );
}

#[test]
fn json_record_for_capacity() {
    let full = LaunchOutcome::RejectedCapacity {
        current_count: 3,
        max: 2,
    };
    let json = serde_json::to_value(OutcomeRecord::new("job-3", &full)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "job_id": "job-3",
            "outcome": "rejected_capacity",
            "current_count": 3,
            "max": 2,
        })
    );
}

#[test]
fn json_record_for_failure() {
    let failed = LaunchOutcome::LaunchFailed {
        job_id: JobId::new("job-1"),
        cause: LaunchFailure::DuplicateJob,
    };
    let json = serde_json::to_value(OutcomeRecord::new("job-1", &failed)).unwrap();
    assert_eq!(json["outcome"], "failed");
    assert_eq!(json["cause"], "duplicate");
    assert_eq!(json["message"], "job is already tracked");
    assert!(json.get("max").is_none());
}
