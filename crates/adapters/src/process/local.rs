// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local OS process executor backed by `tokio::process`

use super::{ProcessError, ProcessExecutor, ProcessExit, ProcessHandle};
use async_trait::async_trait;
use hatch_core::AgentCommand;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::{Child, Command};

/// Starts agents as children of this server.
///
/// Stdin is closed. Stdout and stderr go to `<output_dir>/<name>.log` when an
/// output directory is configured and are discarded otherwise.
#[derive(Debug, Clone, Default)]
pub struct LocalProcessExecutor {
    output_dir: Option<PathBuf>,
}

impl LocalProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(dir.into()),
        }
    }

    /// Path the output of launch `name` is captured to, if capture is enabled
    pub fn output_path(&self, name: &str) -> Option<PathBuf> {
        self.output_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.log", sanitize(name))))
    }

    fn open_output(&self, name: &str) -> Result<Option<(File, File)>, ProcessError> {
        let Some(path) = self.output_path(name) else {
            return Ok(None);
        };
        let open = |path: &Path| -> std::io::Result<(File, File)> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let out = OpenOptions::new().create(true).append(true).open(path)?;
            let err = out.try_clone()?;
            Ok((out, err))
        };
        open(&path)
            .map(Some)
            .map_err(|source| ProcessError::OutputLog { path, source })
    }
}

#[async_trait]
impl ProcessExecutor for LocalProcessExecutor {
    type Handle = LocalProcessHandle;

    /// Opening the output log and the spawn itself run on the blocking pool,
    /// so a caller's timeout can fire while either is stuck. If this future
    /// is dropped first, the child is killed as soon as it exists.
    async fn start(
        &self,
        name: &str,
        command: &AgentCommand,
    ) -> Result<LocalProcessHandle, ProcessError> {
        let pending = PendingStart::new(name);
        let slot = Arc::clone(&pending.slot);
        let executor = self.clone();
        let name = name.to_string();
        let command = command.clone();
        let runtime = tokio::runtime::Handle::current();

        tokio::task::spawn_blocking(move || {
            let _runtime = runtime.enter();
            let child = executor.spawn_child(&name, &command)?;
            deliver(&slot, child, &name);
            Ok::<_, ProcessError>(())
        })
        .await
        .map_err(|e| ProcessError::SpawnFailed(e.to_string()))??;

        let child = pending
            .claim()
            .ok_or_else(|| ProcessError::SpawnFailed("spawned child went missing".to_string()))?;
        Ok(LocalProcessHandle {
            pid: child.id(),
            inner: Mutex::new(ChildState { child, exit: None }),
        })
    }
}

impl LocalProcessExecutor {
    fn spawn_child(&self, name: &str, command: &AgentCommand) -> Result<Child, ProcessError> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            // Agents outlive their handle; the observer drops handles on exit
            .kill_on_drop(false);

        match self.open_output(name)? {
            Some((out, err)) => {
                cmd.stdout(Stdio::from(out)).stderr(Stdio::from(err));
            }
            None => {
                cmd.stdout(Stdio::null()).stderr(Stdio::null());
            }
        }

        cmd.spawn()
            .map_err(|e| ProcessError::from_spawn(&command.program, e))
    }
}

/// Hand-off between the blocking spawn and the `start` future.
#[derive(Default)]
struct Pending {
    abandoned: bool,
    child: Option<Child>,
}

/// Owned by the `start` future. Dropping it abandons the start.
struct PendingStart {
    name: String,
    slot: Arc<Mutex<Pending>>,
}

impl PendingStart {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            slot: Arc::new(Mutex::new(Pending::default())),
        }
    }

    fn claim(&self) -> Option<Child> {
        self.slot.lock().child.take()
    }
}

impl Drop for PendingStart {
    fn drop(&mut self) {
        let mut pending = self.slot.lock();
        pending.abandoned = true;
        if let Some(child) = pending.child.take() {
            kill_abandoned(child, &self.name);
        }
    }
}

fn deliver(slot: &Mutex<Pending>, child: Child, name: &str) {
    let mut pending = slot.lock();
    if pending.abandoned {
        kill_abandoned(child, name);
    } else {
        pending.child = Some(child);
    }
}

fn kill_abandoned(mut child: Child, name: &str) {
    let pid = child.id();
    match child.start_kill() {
        Ok(()) => tracing::warn!(name, ?pid, "killed agent whose start was abandoned"),
        Err(e) => tracing::error!(name, ?pid, error = %e, "cannot kill abandoned agent"),
    }
}

struct ChildState {
    child: Child,
    exit: Option<ProcessExit>,
}

/// Handle to a child started by [`LocalProcessExecutor`]
pub struct LocalProcessHandle {
    pid: Option<u32>,
    inner: Mutex<ChildState>,
}

impl ProcessHandle for LocalProcessHandle {
    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn try_exit(&self) -> Result<Option<ProcessExit>, ProcessError> {
        let mut state = self.inner.lock();
        if let Some(exit) = state.exit {
            return Ok(Some(exit));
        }
        match state.child.try_wait() {
            Ok(Some(status)) => {
                let exit = ProcessExit::from(status);
                state.exit = Some(exit);
                Ok(Some(exit))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(ProcessError::WaitFailed(e.to_string())),
        }
    }

    fn kill(&self) -> Result<(), ProcessError> {
        let mut state = self.inner.lock();
        if state.exit.is_some() {
            return Ok(());
        }
        match state.child.start_kill() {
            Ok(()) => Ok(()),
            // Already reaped between the check above and the signal
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(ProcessError::KillFailed(e.to_string())),
        }
    }
}

impl std::fmt::Debug for LocalProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalProcessHandle")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

/// Job ids are free-form; keep the log file inside the output directory.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
