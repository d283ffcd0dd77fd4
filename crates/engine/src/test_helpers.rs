// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::{LauncherDeps, LocalAgentLauncher};
use hatch_adapters::{FakeJobQuery, FakeMetrics, FakeProcessExecutor};
use hatch_core::{FakeClock, HostIdentity, LauncherConfig, LauncherConfigBuilder};

/// Convenience alias for the fully-typed test launcher.
pub(crate) type TestLauncher =
    LocalAgentLauncher<FakeProcessExecutor, FakeJobQuery, FakeMetrics, FakeClock>;

/// Test context holding the launcher and handles to its fakes.
pub(crate) struct TestContext {
    pub launcher: TestLauncher,
    pub executor: FakeProcessExecutor,
    pub query: FakeJobQuery,
    pub metrics: FakeMetrics,
    pub clock: FakeClock,
}

/// Launcher config for `sh` with the given capacity
pub(crate) fn config(max: i64) -> LauncherConfigBuilder {
    LauncherConfig::builder("sh").max_jobs_per_host(max)
}

pub(crate) fn setup(max: i64) -> TestContext {
    setup_with(config(max))
}

pub(crate) fn setup_with(config: LauncherConfigBuilder) -> TestContext {
    let executor = FakeProcessExecutor::new();
    let query = FakeJobQuery::new();
    let metrics = FakeMetrics::new();
    let clock = FakeClock::new();
    let launcher = LocalAgentLauncher::new(
        LauncherDeps {
            executor: executor.clone(),
            query: query.clone(),
            metrics: metrics.clone(),
        },
        HostIdentity::new("10.0.0.5", 8080).unwrap(),
        config.build().unwrap(),
        clock.clone(),
    );
    TestContext {
        launcher,
        executor,
        query,
        metrics,
        clock,
    }
}
