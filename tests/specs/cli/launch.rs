//! `hatch launch` specs
//!
//! Agents receive `<job_id> <host> <rpc_port> [extra_args...]`; admission
//! never exceeds `max_jobs_per_host`; any job not admitted makes the run
//! exit with code 2.

use crate::prelude::*;

#[test]
fn admitted_agent_receives_positional_args() {
    let host = Host::new();
    let agent = host.agent(ECHO_AGENT);
    host.config(&agent, 2, r#"extra_args = ["--full-cleanup"]"#);

    host.hatch(&["launch", "--wait", "job-42"])
        .passes()
        .stdout_has("admitted job-42");

    assert_eq!(host.agent_log("job-42"), "job-42 127.0.0.1 8080 --full-cleanup\n");
}

#[test]
fn agent_receives_identity_environment() {
    let host = Host::new();
    let agent = host.agent(ENV_AGENT);
    host.config(&agent, 1, "");

    host.hatch(&["launch", "--wait", "job-7"]).passes();

    assert_eq!(host.agent_log("job-7"), "job-7 127.0.0.1 8080\n");
}

#[test]
fn capacity_is_never_exceeded() {
    let host = Host::new();
    let agent = host.agent(SLOW_AGENT);
    host.config(&agent, 2, "");

    let run = host
        .hatch(&["launch", "--wait", "job-1", "job-2", "job-3", "job-4"])
        .fails()
        .code(2);

    assert_eq!(run.lines_starting("admitted ").len(), 2, "{}", run.stdout());
    let rejected = run.lines_starting("rejected ");
    assert_eq!(rejected.len(), 2, "{}", run.stdout());
    assert!(rejected.iter().all(|l| l.ends_with(": capacity 2/2")));
}

#[test]
fn drain_rejects_everything() {
    let host = Host::new();
    let agent = host.agent(ECHO_AGENT);
    host.config(&agent, 0, "");

    host.hatch(&["launch", "job-1"])
        .fails()
        .code(2)
        .stdout_has("rejected job-1: capacity 0/0")
        .stdout_lacks("admitted");

    assert_eq!(host.agent_log("job-1"), "");
}

#[test]
fn duplicate_ids_start_once() {
    let host = Host::new();
    let agent = host.agent(SLOW_AGENT);
    host.config(&agent, 4, "");

    let run = host
        .hatch(&["launch", "--wait", "job-1", "job-1"])
        .fails()
        .code(2);

    assert_eq!(run.lines_starting("admitted job-1").len(), 1);
    assert_eq!(
        run.lines_starting("failed job-1: job is already tracked").len(),
        1
    );
    assert_eq!(host.agent_log("job-1"), "job-1\n");
}

#[test]
fn invalid_job_id_rejected() {
    let host = Host::new();
    let agent = host.agent(ECHO_AGENT);
    host.config(&agent, 2, "");

    host.hatch(&["launch", "job 1"])
        .fails()
        .code(2)
        .stdout_has("contains whitespace or control characters");
}

#[test]
fn generated_ids_when_none_given() {
    let host = Host::new();
    let agent = host.agent(ECHO_AGENT);
    host.config(&agent, 3, "");

    let run = host.hatch(&["launch", "--wait", "--count", "3"]).passes();

    assert_eq!(run.lines_starting("admitted ").len(), 3);
}

#[test]
fn query_failure_rejects_conservatively() {
    let host = Host::new();
    let agent = host.agent(ECHO_AGENT);
    host.config(&agent, 2, "");
    let config = std::fs::read_to_string(host.config_path()).unwrap();
    std::fs::write(
        host.config_path(),
        format!("{}\n[query]\ncommand = \"exit 3\"\n", config),
    )
    .unwrap();

    host.hatch(&["launch", "job-1"])
        .fails()
        .code(2)
        .stdout_has("rejected job-1: capacity 2/2");
}

#[test]
fn query_count_is_added_to_local_count() {
    let host = Host::new();
    let agent = host.agent(ECHO_AGENT);
    host.config(&agent, 2, "");
    let config = std::fs::read_to_string(host.config_path()).unwrap();
    std::fs::write(
        host.config_path(),
        format!("{}\n[query]\ncommand = \"echo 2\"\n", config),
    )
    .unwrap();

    host.hatch(&["launch", "job-1"])
        .fails()
        .code(2)
        .stdout_has("rejected job-1: capacity 2/2");
}

#[test]
fn metrics_are_printed() {
    let host = Host::new();
    let agent = host.agent(SLOW_AGENT);
    host.config(&agent, 1, "");

    host.hatch(&["launch", "--wait", "--metrics", "job-1", "job-2"])
        .fails()
        .code(2)
        .stdout_has("hatch_launch_admitted_total 1")
        .stdout_has("hatch_launch_rejected_capacity_total{reason=\"capacity\"} 1")
        .stdout_has("hatch_launch_process_exited_total{exit_code=\"0\"} 1");
}

#[test]
fn json_outcomes() {
    let host = Host::new();
    let agent = host.agent(ECHO_AGENT);
    host.config(&agent, 1, "");

    host.hatch(&["launch", "-o", "json", "--wait", "job-1"])
        .passes()
        .stdout_has(r#"{"job_id":"job-1","outcome":"admitted"}"#);
}

#[test]
fn logs_written_to_file() {
    let host = Host::new();
    let agent = host.agent(ECHO_AGENT);
    host.config(&agent, 1, "");
    let log = host.path().join("hatch.log");

    host.hatch(&["launch", "--wait", "--log-file", log.to_str().unwrap(), "job-1"])
        .passes();

    let text = std::fs::read_to_string(&log).unwrap();
    assert!(text.contains("agent started"), "log: {text}");
    assert!(text.contains("agent exited"), "log: {text}");
}
