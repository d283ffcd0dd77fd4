// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent command line.
//!
//! The agent bootstraps by reading its arguments positionally:
//!
//! ```text
//! <executable> <job_id> <host_address> <rpc_port> [extra_args...]
//! ```
//!
//! The order is a contract with the agent binary; changing it breaks every
//! deployed agent.

use crate::config::LauncherConfig;
use crate::host::HostIdentity;
use crate::job::JobId;
use std::fmt;
use std::path::PathBuf;

pub const ENV_JOB_ID: &str = "HATCH_JOB_ID";
pub const ENV_SERVER_HOST: &str = "HATCH_SERVER_HOST";
pub const ENV_SERVER_PORT: &str = "HATCH_SERVER_PORT";

/// Fully resolved invocation of one agent process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Added on top of the inherited server environment
    pub env: Vec<(String, String)>,
}

impl AgentCommand {
    pub fn build(job_id: &JobId, host: &HostIdentity, config: &LauncherConfig) -> Self {
        let port = host.rpc_port().to_string();

        let mut args = Vec::with_capacity(3 + config.extra_args().len());
        args.push(job_id.to_string());
        args.push(host.address().to_string());
        args.push(port.clone());
        args.extend(config.extra_args().iter().cloned());

        // Configured variables first so the identity variables always win
        let mut env: Vec<(String, String)> = config
            .env()
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), ENV_JOB_ID | ENV_SERVER_HOST | ENV_SERVER_PORT))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        env.push((ENV_JOB_ID.to_string(), job_id.to_string()));
        env.push((ENV_SERVER_HOST.to_string(), host.address().to_string()));
        env.push((ENV_SERVER_PORT.to_string(), port));

        Self {
            program: config.executable().to_path_buf(),
            args,
            env,
        }
    }
}

impl fmt::Display for AgentCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
