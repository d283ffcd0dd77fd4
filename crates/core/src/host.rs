// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity of this server as seen by the agents it launches.

use crate::config::ConfigError;
use serde::Serialize;
use std::fmt;

/// Host address and RPC port an agent dials back to.
///
/// Built once at startup and passed explicitly to the launcher; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostIdentity {
    address: String,
    rpc_port: u16,
}

impl HostIdentity {
    pub fn new(address: impl Into<String>, rpc_port: u16) -> Result<Self, ConfigError> {
        let address = address.into();
        if address.trim().is_empty() {
            return Err(ConfigError::EmptyHostAddress);
        }
        if rpc_port == 0 {
            return Err(ConfigError::InvalidRpcPort(0));
        }
        Ok(Self { address, rpc_port })
    }

    /// Build from config-file values.
    ///
    /// A missing address falls back to the machine hostname; the port is taken
    /// as a wide integer so out-of-range values are reported, not truncated.
    pub fn from_raw(address: Option<&str>, rpc_port: i64) -> Result<Self, ConfigError> {
        let port = u16::try_from(rpc_port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or(ConfigError::InvalidRpcPort(rpc_port))?;
        let address = match address {
            Some(a) => a.to_string(),
            None => local_hostname()?,
        };
        Self::new(address, port)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn rpc_port(&self) -> u16 {
        self.rpc_port
    }
}

impl fmt::Display for HostIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.rpc_port)
    }
}

fn local_hostname() -> Result<String, ConfigError> {
    hostname::get()
        .map_err(|e| ConfigError::NoHostname(e.to_string()))?
        .into_string()
        .map_err(|raw| ConfigError::NoHostname(format!("non-UTF-8 hostname {:?}", raw)))
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
