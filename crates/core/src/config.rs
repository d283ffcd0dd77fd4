// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launcher configuration.
//!
//! The `Raw*` types mirror the TOML file one-to-one and accept anything that
//! parses; `validate` turns them into the immutable types the launcher runs
//! with. Validation happens once at startup, never per launch.

use crate::duration::parse_duration;
use crate::host::HostIdentity;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_LAUNCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_ORPHAN_TIMEOUT: Duration = Duration::from_secs(24 * 3600);
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_QUERY_CACHE_TTL: Duration = Duration::from_secs(1);

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("max_jobs_per_host must be zero or positive, got {0}")]
    InvalidMaxJobs(i64),
    #[error("agent executable not found: {0}")]
    ExecutableNotFound(String),
    #[error("agent executable is not an executable file: {}", .0.display())]
    ExecutableNotRunnable(PathBuf),
    #[error("invalid duration for {field}: {message}")]
    InvalidDuration { field: &'static str, message: String },
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
    #[error("invalid environment variable name: {0:?}")]
    InvalidEnvKey(String),
    #[error("host address is empty")]
    EmptyHostAddress,
    #[error("rpc_port must be in 1..=65535, got {0}")]
    InvalidRpcPort(i64),
    #[error("could not determine hostname: {0}")]
    NoHostname(String),
}

/// Whole config file as written on disk
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawHatchConfig {
    pub host: RawHostConfig,
    pub launcher: RawLauncherConfig,
    #[serde(default)]
    pub query: RawQueryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawHostConfig {
    pub address: Option<String>,
    pub rpc_port: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLauncherConfig {
    pub max_jobs_per_host: i64,
    pub executable: String,
    pub launch_timeout: Option<String>,
    #[serde(default)]
    pub extra_args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    pub output_dir: Option<PathBuf>,
    pub poll_interval: Option<String>,
    pub orphan_timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawQueryConfig {
    pub command: Option<String>,
    pub timeout: Option<String>,
    pub cache_ttl: Option<String>,
}

/// Validated configuration for the whole process
#[derive(Debug, Clone)]
pub struct HatchConfig {
    pub host: HostIdentity,
    pub launcher: LauncherConfig,
    pub query: QueryConfig,
}

impl HatchConfig {
    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let raw: RawHatchConfig = toml::from_str(text)?;
        Self::validate(raw)
    }

    pub fn validate(raw: RawHatchConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            host: HostIdentity::from_raw(raw.host.address.as_deref(), raw.host.rpc_port)?,
            launcher: LauncherConfig::validate(raw.launcher)?,
            query: QueryConfig::validate(raw.query)?,
        })
    }
}

/// How the external running-job count is obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Shell command printing the number of active jobs; `None` means this
    /// launcher is the only source of jobs on the host.
    pub command: Option<String>,
    pub timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            command: None,
            timeout: DEFAULT_QUERY_TIMEOUT,
            cache_ttl: DEFAULT_QUERY_CACHE_TTL,
        }
    }
}

impl QueryConfig {
    pub fn validate(raw: RawQueryConfig) -> Result<Self, ConfigError> {
        let command = raw.command.filter(|c| !c.trim().is_empty());
        let timeout = duration_field("query.timeout", raw.timeout, DEFAULT_QUERY_TIMEOUT)?;
        non_zero("query.timeout", timeout)?;
        // A zero TTL disables caching
        let cache_ttl =
            duration_field("query.cache_ttl", raw.cache_ttl, DEFAULT_QUERY_CACHE_TTL)?;
        Ok(Self {
            command,
            timeout,
            cache_ttl,
        })
    }
}

/// Validated launcher settings.
///
/// Only constructible through [`LauncherConfig::validate`] or
/// [`LauncherConfig::builder`], so holding one means the values were checked.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    max_jobs_per_host: usize,
    executable: PathBuf,
    launch_timeout: Duration,
    extra_args: Vec<String>,
    env: BTreeMap<String, String>,
    output_dir: Option<PathBuf>,
    poll_interval: Duration,
    orphan_timeout: Duration,
}

impl LauncherConfig {
    pub fn validate(raw: RawLauncherConfig) -> Result<Self, ConfigError> {
        Unchecked {
            max_jobs_per_host: raw.max_jobs_per_host,
            executable: raw.executable,
            launch_timeout: duration_field(
                "launch_timeout",
                raw.launch_timeout,
                DEFAULT_LAUNCH_TIMEOUT,
            )?,
            extra_args: raw.extra_args,
            env: raw.env,
            output_dir: raw.output_dir,
            poll_interval: duration_field(
                "poll_interval",
                raw.poll_interval,
                DEFAULT_POLL_INTERVAL,
            )?,
            orphan_timeout: duration_field(
                "orphan_timeout",
                raw.orphan_timeout,
                DEFAULT_ORPHAN_TIMEOUT,
            )?,
        }
        .check()
    }

    pub fn builder(executable: impl Into<String>) -> LauncherConfigBuilder {
        LauncherConfigBuilder {
            inner: Unchecked {
                max_jobs_per_host: 1,
                executable: executable.into(),
                launch_timeout: DEFAULT_LAUNCH_TIMEOUT,
                extra_args: Vec::new(),
                env: BTreeMap::new(),
                output_dir: None,
                poll_interval: DEFAULT_POLL_INTERVAL,
                orphan_timeout: DEFAULT_ORPHAN_TIMEOUT,
            },
        }
    }

    /// Zero means drain: every launch is rejected for capacity.
    pub fn max_jobs_per_host(&self) -> usize {
        self.max_jobs_per_host
    }

    /// Resolved path of the agent binary
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn launch_timeout(&self) -> Duration {
        self.launch_timeout
    }

    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn orphan_timeout(&self) -> Duration {
        self.orphan_timeout
    }
}

/// Programmatic construction of a [`LauncherConfig`], validated on `build`.
#[derive(Debug, Clone)]
pub struct LauncherConfigBuilder {
    inner: Unchecked,
}

impl LauncherConfigBuilder {
    /// Signed so callers can pass through unchecked input; negatives fail `build`.
    pub fn max_jobs_per_host(mut self, max: i64) -> Self {
        self.inner.max_jobs_per_host = max;
        self
    }

    pub fn launch_timeout(mut self, timeout: Duration) -> Self {
        self.inner.launch_timeout = timeout;
        self
    }

    pub fn extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.env.insert(key.into(), value.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.inner.output_dir = Some(dir.into());
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.inner.poll_interval = interval;
        self
    }

    pub fn orphan_timeout(mut self, timeout: Duration) -> Self {
        self.inner.orphan_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<LauncherConfig, ConfigError> {
        self.inner.check()
    }
}

#[derive(Debug, Clone)]
struct Unchecked {
    max_jobs_per_host: i64,
    executable: String,
    launch_timeout: Duration,
    extra_args: Vec<String>,
    env: BTreeMap<String, String>,
    output_dir: Option<PathBuf>,
    poll_interval: Duration,
    orphan_timeout: Duration,
}

impl Unchecked {
    fn check(self) -> Result<LauncherConfig, ConfigError> {
        let max_jobs_per_host = usize::try_from(self.max_jobs_per_host)
            .map_err(|_| ConfigError::InvalidMaxJobs(self.max_jobs_per_host))?;
        non_zero("launch_timeout", self.launch_timeout)?;
        non_zero("poll_interval", self.poll_interval)?;
        non_zero("orphan_timeout", self.orphan_timeout)?;
        if let Some(key) = self
            .env
            .keys()
            .find(|k| k.is_empty() || k.contains('=') || k.contains('\0'))
        {
            return Err(ConfigError::InvalidEnvKey(key.clone()));
        }
        let executable = resolve_executable(&self.executable)?;

        Ok(LauncherConfig {
            max_jobs_per_host,
            executable,
            launch_timeout: self.launch_timeout,
            extra_args: self.extra_args,
            env: self.env,
            output_dir: self.output_dir,
            poll_interval: self.poll_interval,
            orphan_timeout: self.orphan_timeout,
        })
    }
}

fn duration_field(
    field: &'static str,
    value: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match value {
        Some(s) => parse_duration(&s).map_err(|message| ConfigError::InvalidDuration {
            field,
            message,
        }),
        None => Ok(default),
    }
}

fn non_zero(field: &'static str, d: Duration) -> Result<(), ConfigError> {
    if d.is_zero() {
        return Err(ConfigError::ZeroDuration { field });
    }
    Ok(())
}

/// Resolve the agent binary the way a shell would.
///
/// Anything containing a path separator is checked as given; a bare name is
/// searched on `PATH`.
pub fn resolve_executable(name: &str) -> Result<PathBuf, ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::ExecutableNotFound(name.to_string()));
    }
    let path = Path::new(name);
    if path.is_absolute() || path.components().count() > 1 {
        if !path.exists() {
            return Err(ConfigError::ExecutableNotFound(name.to_string()));
        }
        if !is_executable(path) {
            return Err(ConfigError::ExecutableNotRunnable(path.to_path_buf()));
        }
        return Ok(path.to_path_buf());
    }

    let search = std::env::var_os("PATH").unwrap_or_default();
    std::env::split_paths(&search)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
        .ok_or_else(|| ConfigError::ExecutableNotFound(name.to_string()))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
