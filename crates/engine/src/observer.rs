// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process lifecycle observer.
//!
//! A single poller walks the tracking table every `poll_interval` and drops
//! entries whose process has exited. Entries whose exit cannot be observed
//! are kept until they are older than `orphan_timeout`, then dropped.
//! Metrics and logs are emitted after the table lock is released.

use crate::env;
use crate::launcher::LocalAgentLauncher;
use crate::metric_names as names;
use hatch_adapters::{MetricsSink, ProcessExecutor, ProcessExit, ProcessHandle, RunningJobQuery};
use hatch_core::clock::age;
use hatch_core::{format_elapsed, Clock, JobId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// What one sweep did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Entries removed because their process exited
    pub exited: usize,
    /// Entries removed by the orphan timeout
    pub expired: usize,
    /// Entries whose exit status could not be read
    pub unobservable: usize,
}

/// Running observer task. Dropping the handle aborts the task.
pub struct ObserverHandle {
    stop: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl ObserverHandle {
    /// Stop the observer and wait for its current sweep to finish
    pub async fn shutdown(mut self) {
        self.stop.notify_one();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "lifecycle observer ended abnormally");
            }
        }
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct Unobservable {
    job_id: JobId,
    error: String,
    age: Duration,
    expired: bool,
}

impl<P, Q, M, C> LocalAgentLauncher<P, Q, M, C>
where
    P: ProcessExecutor,
    Q: RunningJobQuery,
    M: MetricsSink,
    C: Clock,
{
    /// Run one observer pass over every running entry.
    pub fn sweep(&self) -> SweepReport {
        let now = self.inner.clock.now();
        let orphan_timeout = self.inner.config.orphan_timeout();
        let mut exited = Vec::new();
        let mut unobservable = Vec::new();

        self.inner.table.lock().retain_running(|launch| {
            let age = age(launch.started_at, now);
            match launch.handle.try_exit() {
                Ok(None) => true,
                Ok(Some(exit)) => {
                    exited.push((launch.job_id.clone(), launch.handle.pid(), exit, age));
                    false
                }
                Err(e) => {
                    let expired = age >= orphan_timeout;
                    unobservable.push(Unobservable {
                        job_id: launch.job_id.clone(),
                        error: e.to_string(),
                        age,
                        expired,
                    });
                    !expired
                }
            }
        });

        let mut report = SweepReport {
            exited: exited.len(),
            unobservable: unobservable.len(),
            ..SweepReport::default()
        };
        for (job_id, pid, exit, age) in exited {
            self.record_exit(&job_id, pid, exit, age);
        }
        for entry in unobservable {
            self.inner.metrics.increment(names::OBSERVER_FAILED, &[]);
            tracing::warn!(
                job_id = %entry.job_id,
                error = %entry.error,
                "cannot observe agent exit"
            );
            if entry.expired {
                report.expired += 1;
                self.inner.metrics.increment(names::TRACKING_EXPIRED, &[]);
                tracing::warn!(
                    job_id = %entry.job_id,
                    age = %format_elapsed(entry.age),
                    "dropping agent whose exit was never observed"
                );
            }
        }
        report
    }

    /// Start the observer on the current tokio runtime.
    ///
    /// The tick is `poll_interval` from the config, overridable with
    /// `HATCH_POLL_MS`.
    pub fn spawn_observer(&self) -> ObserverHandle {
        let period = env::poll_ms().unwrap_or_else(|| self.inner.config.poll_interval());
        let stop = Arc::new(Notify::new());
        let notified = Arc::clone(&stop);
        let launcher = self.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!(period_ms = period.as_millis() as u64, "lifecycle observer started");
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let report = launcher.sweep();
                        if report != SweepReport::default() {
                            tracing::debug!(?report, "observer sweep");
                        }
                    }
                    _ = notified.notified() => break,
                }
            }
            tracing::debug!("lifecycle observer stopped");
        });

        ObserverHandle {
            stop,
            task: Some(task),
        }
    }

    pub(crate) fn record_exit(
        &self,
        job_id: &JobId,
        pid: Option<u32>,
        exit: ProcessExit,
        age: Duration,
    ) {
        let label = exit.label();
        self.inner
            .metrics
            .increment(names::PROCESS_EXITED, &[(names::TAG_EXIT_CODE, label.as_str())]);
        tracing::info!(
            job_id = %job_id,
            ?pid,
            %exit,
            age = %format_elapsed(age),
            "agent exited"
        );
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
