// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::process::FakeProcessExecutor;
use crate::query::FakeJobQuery;
use serial_test::{parallel, serial};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn assert_log(logs: &str, label: &str, expected: &str) {
    assert!(logs.contains(expected), "Should log {label}. Logs:\n{logs}");
}

fn command() -> AgentCommand {
    AgentCommand {
        program: PathBuf::from("/usr/bin/agent"),
        args: vec!["job-1".into(), "10.0.0.5".into(), "8080".into()],
        env: vec![],
    }
}

#[test]
#[serial(tracing)]
fn start_logs_span_and_pid() {
    let fake = FakeProcessExecutor::new();
    let traced = TracedExecutor::new(fake.clone());

    let (logs, result) = with_tracing(|| async { traced.start("job-1", &command()).await });

    assert!(result.is_ok());
    assert_eq!(fake.start_count(), 1);
    assert_log(&logs, "span name", "process.start");
    assert_log(&logs, "job field", "job=\"job-1\"");
    assert_log(&logs, "program", "/usr/bin/agent");
    assert_log(&logs, "success", "process started");
    assert_log(&logs, "pid", "pid=Some(1001)");
}

#[test]
#[serial(tracing)]
fn start_failure_logs_error() {
    let fake = FakeProcessExecutor::new();
    fake.set_start_error(ProcessError::SpawnFailed("no fork".into()));
    let traced = TracedExecutor::new(fake);

    let (logs, result) = with_tracing(|| async { traced.start("job-2", &command()).await });

    assert!(matches!(result, Err(ProcessError::SpawnFailed(_))));
    assert_log(&logs, "error level", "ERROR");
    assert_log(&logs, "failure message", "start failed");
    assert_log(&logs, "cause", "no fork");
}

#[test]
#[serial(tracing)]
fn query_failure_logs_warning() {
    let fake = FakeJobQuery::new();
    fake.set_failure(Some("server down"));
    let traced = TracedQuery::new(fake);

    let (logs, result) = with_tracing(|| async { traced.count_active_jobs("host-a").await });

    assert!(result.is_err());
    assert_log(&logs, "span name", "query.count");
    assert_log(&logs, "warning", "count failed");
    assert_log(&logs, "cause", "server down");
}

#[tokio::test]
#[parallel(tracing)]
async fn wrappers_pass_results_through() {
    let query = FakeJobQuery::new();
    query.set_count(3);
    let traced = TracedQuery::new(query.clone());
    assert_eq!(traced.count_active_jobs("host-a").await.unwrap(), 3);
    assert_eq!(query.hosts(), vec!["host-a".to_string()]);

    let exec = FakeProcessExecutor::new();
    let traced = TracedExecutor::new(exec.clone());
    let handle = traced.start("job-3", &command()).await.unwrap();
    assert_eq!(handle.pid(), exec.handle("job-3").and_then(|h| h.pid()));
    assert_eq!(exec.start_count(), 1);
}
