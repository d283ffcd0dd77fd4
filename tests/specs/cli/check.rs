//! `hatch check` specs
//!
//! Configuration is validated once, up front; invalid files exit non-zero
//! with a message naming the problem.

use crate::prelude::*;

#[test]
fn valid_config_is_summarized() {
    let host = Host::new();
    let agent = host.agent(ECHO_AGENT);
    host.config(&agent, 4, r#"extra_args = ["--api-job"]"#);

    host.hatch(&["check"])
        .passes()
        .stdout_has("host: 127.0.0.1:8080")
        .stdout_has("max jobs per host: 4")
        .stdout_has(&format!("executable: {}", agent.display()))
        .stdout_has("extra args: --api-job")
        .stdout_has("running-job query: none (standalone)");
}

#[test]
fn negative_max_jobs_fails_validation() {
    let host = Host::new();
    let agent = host.agent(ECHO_AGENT);
    host.config(&agent, -1, "");

    host.hatch(&["check"])
        .fails()
        .code(1)
        .stderr_has("max_jobs_per_host must be zero or positive, got -1");
}

#[test]
fn zero_max_jobs_is_drain_mode() {
    let host = Host::new();
    let agent = host.agent(ECHO_AGENT);
    host.config(&agent, 0, "");

    host.hatch(&["check"])
        .passes()
        .stdout_has("max jobs per host: 0 (drain");
}

#[test]
fn missing_executable_fails_validation() {
    let host = Host::new();
    host.config(&host.path().join("no-such-agent"), 2, "");

    host.hatch(&["check"])
        .fails()
        .stderr_has("agent executable not found");
}

#[test]
fn zero_launch_timeout_fails_validation() {
    let host = Host::new();
    let agent = host.agent(ECHO_AGENT);
    host.config(&agent, 2, r#"launch_timeout = "0s""#);

    host.hatch(&["check"]).fails().stderr_has("launch_timeout");
}

#[test]
fn missing_config_file_names_path() {
    let host = Host::new();

    host.hatch(&["check"])
        .fails()
        .stderr_has(&host.config_path().display().to_string());
}

#[test]
fn config_from_environment() {
    let host = Host::new();
    let agent = host.agent(ECHO_AGENT);
    host.config(&agent, 3, "");

    cli()
        .args(&["check"])
        .env("HATCH_CONFIG", host.config_path())
        .passes()
        .stdout_has("max jobs per host: 3");
}

#[test]
fn json_output() {
    let host = Host::new();
    let agent = host.agent(ECHO_AGENT);
    host.config(&agent, 2, "");

    host.hatch(&["check", "-o", "json"])
        .passes()
        .stdout_has(r#""max_jobs_per_host": 2"#)
        .stdout_has(r#""rpc_port": 8080"#)
        .stdout_has(r#""query": "standalone""#);
}
