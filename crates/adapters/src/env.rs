// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Override for the running-job query cache TTL.
pub fn query_cache_ms() -> Option<Duration> {
    parse_duration_ms("HATCH_QUERY_CACHE_MS")
}

/// Shell used to run the running-job query command (default: `sh`).
pub fn query_shell() -> String {
    std::env::var("HATCH_SHELL")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "sh".to_string())
}
