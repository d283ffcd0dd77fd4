//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for running `hatch` against a temporary host setup.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// Fast observer ticks so `--wait` returns promptly.
const HATCH_POLL_MS: &str = "20";

/// Returns the path to the hatch binary, checking the llvm-cov target
/// directory first so coverage runs use the instrumented build.
fn hatch_binary() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug/hatch");
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    assert_cmd::cargo::cargo_bin("hatch")
}

/// Create a CLI builder for hatch commands
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

/// High-level CLI builder for fluent test assertions
pub struct CliBuilder {
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            envs: vec![("HATCH_POLL_MS".into(), HATCH_POLL_MS.into())],
        }
    }

    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    /// Build the command without running it
    pub fn command(self) -> Command {
        let mut cmd = Command::new(hatch_binary());
        cmd.args(&self.args);

        // Keep the caller's config and log filter out of specs
        cmd.env_remove("HATCH_CONFIG");
        cmd.env_remove("HATCH_QUERY_CACHE_MS");
        cmd.env_remove("RUST_LOG");

        for (key, value) in self.envs {
            cmd.env(key, value);
        }

        cmd
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code)
    pub fn fails(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn code(self, expected: i32) -> Self {
        assert_eq!(
            self.output.status.code(),
            Some(expected),
            "stdout: {}\nstderr: {}",
            self.stdout(),
            self.stderr()
        );
        self
    }

    /// Assert stdout contains substring.
    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    /// Assert stdout does not contain substring.
    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout should not contain '{}'\nstdout: {}",
            unexpected,
            stdout
        );
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }

    /// Lines of stdout starting with `prefix`
    pub fn lines_starting(&self, prefix: &str) -> Vec<String> {
        self.stdout()
            .lines()
            .filter(|l| l.starts_with(prefix))
            .map(str::to_string)
            .collect()
    }
}

// =============================================================================
// Host
// =============================================================================

/// Agent that prints its positional arguments and exits.
pub const ECHO_AGENT: &str = "#!/bin/sh\necho \"$@\"\n";

/// Agent that stays alive long enough to hold its slot while others launch.
pub const SLOW_AGENT: &str = "#!/bin/sh\nsleep 1\necho \"$1\"\n";

/// Agent that prints its identity environment and exits.
pub const ENV_AGENT: &str =
    "#!/bin/sh\necho \"$HATCH_JOB_ID $HATCH_SERVER_HOST $HATCH_SERVER_PORT\"\n";

/// Temporary host setup: a config file, an agent script and a log directory.
pub struct Host {
    dir: tempfile::TempDir,
}

impl Host {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("hatch.toml")
    }

    pub fn logs(&self) -> PathBuf {
        self.path().join("logs")
    }

    /// Write an executable agent script and return its path
    #[cfg(unix)]
    pub fn agent(&self, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path().join("agent");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Write a config for `agent` with capacity `max`; `extra` is appended
    /// to the `[launcher]` table.
    pub fn config(&self, agent: &Path, max: i64, extra: &str) {
        let text = format!(
            r#"[host]
address = "127.0.0.1"
rpc_port = 8080

[launcher]
max_jobs_per_host = {max}
executable = "{exe}"
output_dir = "{logs}"
poll_interval = "20ms"
{extra}
"#,
            max = max,
            exe = agent.display(),
            logs = self.logs().display(),
            extra = extra,
        );
        std::fs::write(self.config_path(), text).unwrap();
    }

    /// Run `hatch` with `args` followed by `--config <file>`
    pub fn hatch(&self, args: &[&str]) -> CliBuilder {
        let config = self.config_path();
        cli().args(args).args(&["--config", config.to_str().unwrap()])
    }

    /// Captured output of the agent started for `job_id`
    pub fn agent_log(&self, job_id: &str) -> String {
        std::fs::read_to_string(self.logs().join(format!("{}.log", job_id))).unwrap_or_default()
    }
}
