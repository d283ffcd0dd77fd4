// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hatch-core: types shared by the local agent launcher

pub mod clock;
pub mod command;
pub mod config;
pub mod duration;
pub mod host;
pub mod id;
pub mod job;

pub use clock::{Clock, SystemClock};
pub use command::AgentCommand;
pub use config::{
    resolve_executable, ConfigError, HatchConfig, LauncherConfig, LauncherConfigBuilder,
    QueryConfig, RawHatchConfig, RawHostConfig, RawLauncherConfig, RawQueryConfig,
};
pub use duration::{format_elapsed, parse_duration};
pub use host::HostIdentity;
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use job::JobId;

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
