// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process executor for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ProcessError, ProcessExecutor, ProcessExit, ProcessHandle};
use async_trait::async_trait;
use hatch_core::AgentCommand;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Recorded call to [`FakeProcessExecutor::start`]
#[derive(Debug, Clone)]
pub struct StartCall {
    pub name: String,
    pub command: AgentCommand,
}

/// Fake executor: records starts and hands out controllable handles.
///
/// Processes never exit on their own; tests end them with [`exit`](Self::exit).
#[derive(Clone)]
pub struct FakeProcessExecutor {
    inner: Arc<Mutex<FakeExecutorState>>,
}

struct FakeExecutorState {
    calls: Vec<StartCall>,
    handles: HashMap<String, FakeProcessHandle>,
    next_pid: u32,
    start_error: Option<ProcessError>,
    start_delay: Option<Duration>,
}

impl Default for FakeProcessExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeProcessExecutor {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeExecutorState {
                calls: Vec::new(),
                handles: HashMap::new(),
                next_pid: 1000,
                start_error: None,
                start_delay: None,
            })),
        }
    }

    /// All recorded starts, including failed ones
    pub fn calls(&self) -> Vec<StartCall> {
        self.inner.lock().calls.clone()
    }

    pub fn start_count(&self) -> usize {
        self.inner.lock().calls.len()
    }

    /// Fail the next start with `error`
    pub fn set_start_error(&self, error: ProcessError) {
        self.inner.lock().start_error = Some(error);
    }

    /// Make every start take `delay` before returning
    pub fn set_start_delay(&self, delay: Duration) {
        self.inner.lock().start_delay = Some(delay);
    }

    /// Most recent handle started under `name`
    pub fn handle(&self, name: &str) -> Option<FakeProcessHandle> {
        self.inner.lock().handles.get(name).cloned()
    }

    /// Terminate the process started under `name`
    pub fn exit(&self, name: &str, exit: ProcessExit) {
        if let Some(handle) = self.handle(name) {
            handle.set_exit(exit);
        }
    }
}

#[async_trait]
impl ProcessExecutor for FakeProcessExecutor {
    type Handle = FakeProcessHandle;

    async fn start(
        &self,
        name: &str,
        command: &AgentCommand,
    ) -> Result<FakeProcessHandle, ProcessError> {
        let delay = self.inner.lock().start_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.inner.lock();
        inner.calls.push(StartCall {
            name: name.to_string(),
            command: command.clone(),
        });
        if let Some(err) = inner.start_error.take() {
            return Err(err);
        }
        inner.next_pid += 1;
        let handle = FakeProcessHandle::new(inner.next_pid);
        inner.handles.insert(name.to_string(), handle.clone());
        Ok(handle)
    }
}

/// Controllable process handle; clones share state.
#[derive(Debug, Clone)]
pub struct FakeProcessHandle {
    pid: u32,
    state: Arc<Mutex<FakeHandleState>>,
}

#[derive(Debug, Default)]
struct FakeHandleState {
    exit: Option<ProcessExit>,
    observe_error: Option<String>,
    kills: usize,
}

impl FakeProcessHandle {
    fn new(pid: u32) -> Self {
        Self {
            pid,
            state: Arc::new(Mutex::new(FakeHandleState::default())),
        }
    }

    pub fn set_exit(&self, exit: ProcessExit) {
        self.state.lock().exit = Some(exit);
    }

    /// Make every `try_exit` fail until cleared with `None`
    pub fn set_observe_error(&self, message: Option<&str>) {
        self.state.lock().observe_error = message.map(str::to_string);
    }

    pub fn kill_count(&self) -> usize {
        self.state.lock().kills
    }
}

impl ProcessHandle for FakeProcessHandle {
    fn pid(&self) -> Option<u32> {
        Some(self.pid)
    }

    fn try_exit(&self) -> Result<Option<ProcessExit>, ProcessError> {
        let state = self.state.lock();
        if let Some(message) = &state.observe_error {
            return Err(ProcessError::WaitFailed(message.clone()));
        }
        Ok(state.exit)
    }

    fn kill(&self) -> Result<(), ProcessError> {
        let mut state = self.state.lock();
        state.kills += 1;
        if state.exit.is_none() {
            state.exit = Some(ProcessExit::signaled());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
