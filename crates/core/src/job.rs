// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of the job an agent is launched for.
///
/// Unique per launch request; the same value may be reused once the
/// previous agent for it has exited.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check that the ID can travel as a single positional argument.
    ///
    /// The agent parses its arguments positionally, so an empty ID, embedded
    /// whitespace/control characters, or a leading `-` (read as a flag) would
    /// shift or swallow the server address and port.
    pub fn check_positional(&self) -> Result<(), String> {
        let id = self.as_str();
        if id.is_empty() {
            return Err("job id is empty".to_string());
        }
        if id.starts_with('-') {
            return Err(format!("job id {:?} starts with '-'", id));
        }
        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(format!(
                "job id {:?} contains whitespace or control characters",
                id
            ));
        }
        Ok(())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for JobId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for JobId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::borrow::Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
