// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process execution adapters
//!
//! A [`ProcessExecutor`] starts an agent and hands back a [`ProcessHandle`].
//! The executor side owns the OS process and is the only party that reaps
//! it; the launcher only polls the handle.

mod local;

pub use local::{LocalProcessExecutor, LocalProcessHandle};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProcessExecutor, FakeProcessHandle, StartCall};

use async_trait::async_trait;
use hatch_core::AgentCommand;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from process operations
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("executable not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("cannot open output log {}: {source}", path.display())]
    OutputLog {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("wait failed: {0}")]
    WaitFailed(String),
    #[error("kill failed: {0}")]
    KillFailed(String),
}

impl ProcessError {
    pub(crate) fn from_spawn(program: &std::path::Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ProcessError::NotFound(program.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => {
                ProcessError::PermissionDenied(program.to_path_buf())
            }
            _ => ProcessError::SpawnFailed(err.to_string()),
        }
    }
}

/// How a process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code; `None` when terminated by a signal
    pub code: Option<i32>,
}

impl ProcessExit {
    pub fn code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn signaled() -> Self {
        Self { code: None }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Low-cardinality label for metrics
    pub fn label(&self) -> String {
        match self.code {
            Some(code) => code.to_string(),
            None => "signal".to_string(),
        }
    }
}

impl From<std::process::ExitStatus> for ProcessExit {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for ProcessExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => f.write_str("killed by signal"),
        }
    }
}

/// Live handle to a started process.
///
/// All methods are non-blocking so they can be called while the launcher
/// holds its table lock.
pub trait ProcessHandle: Send + Sync + 'static {
    /// OS process id, if the platform reports one
    fn pid(&self) -> Option<u32>;

    /// `Ok(None)` while running; the exit once observed (and on every call after)
    fn try_exit(&self) -> Result<Option<ProcessExit>, ProcessError>;

    fn is_alive(&self) -> Result<bool, ProcessError> {
        Ok(self.try_exit()?.is_none())
    }

    /// Ask the process to stop. Succeeds if it has already exited.
    fn kill(&self) -> Result<(), ProcessError>;
}

/// Starts agent processes
#[async_trait]
pub trait ProcessExecutor: Clone + Send + Sync + 'static {
    type Handle: ProcessHandle;

    /// Start `command` and return as soon as the OS confirms the process exists.
    ///
    /// `name` identifies the launch (the job id) for logs and output capture.
    /// Never waits for the process to finish.
    async fn start(&self, name: &str, command: &AgentCommand)
        -> Result<Self::Handle, ProcessError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
