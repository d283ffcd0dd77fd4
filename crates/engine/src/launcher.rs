// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local agent launcher.
//!
//! `launch` decides whether a job may run on this host and, if so, starts
//! its agent process and tracks it until exit:
//!
//! 1. reject everything while draining (`max_jobs_per_host = 0`), then IDs
//!    that cannot travel as a positional argument
//! 2. ask the running-job query for the host's remote count (outside the lock)
//! 3. check capacity and reserve a slot under the table lock
//! 4. start the agent with `launch_timeout`, holding only the reservation
//! 5. commit the handle, or release the slot on failure
//!
//! Exited agents are removed by the lifecycle observer (see `observer.rs`).

use crate::error::LauncherError;
use crate::metric_names as names;
use crate::outcome::{LaunchFailure, LaunchOutcome};
use crate::status::{JobStatus, LauncherStatus};
use crate::table::{LaunchTable, Refusal, Reservation, TrackedLaunch};
use hatch_adapters::{MetricsSink, ProcessExecutor, ProcessHandle, RunningJobQuery};
use hatch_core::clock::age;
use hatch_core::{AgentCommand, Clock, HostIdentity, JobId, LauncherConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

/// Launcher collaborators, passed explicitly at construction
pub struct LauncherDeps<P, Q, M> {
    pub executor: P,
    pub query: Q,
    pub metrics: M,
}

/// Admits jobs against the host's capacity and starts their agents.
///
/// Cheap to clone; clones share the tracking table.
pub struct LocalAgentLauncher<P: ProcessExecutor, Q, M, C> {
    pub(crate) inner: Arc<Shared<P, Q, M, C>>,
}

pub(crate) struct Shared<P: ProcessExecutor, Q, M, C> {
    pub(crate) executor: P,
    pub(crate) query: Q,
    pub(crate) metrics: M,
    pub(crate) clock: C,
    pub(crate) host: HostIdentity,
    pub(crate) config: LauncherConfig,
    pub(crate) table: Mutex<LaunchTable<P::Handle>>,
}

impl<P: ProcessExecutor, Q, M, C> Clone for LocalAgentLauncher<P, Q, M, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, Q, M, C> LocalAgentLauncher<P, Q, M, C>
where
    P: ProcessExecutor,
    Q: RunningJobQuery,
    M: MetricsSink,
    C: Clock,
{
    /// Create a launcher. `config` and `host` are already validated.
    pub fn new(
        deps: LauncherDeps<P, Q, M>,
        host: HostIdentity,
        config: LauncherConfig,
        clock: C,
    ) -> Self {
        Self {
            inner: Arc::new(Shared {
                executor: deps.executor,
                query: deps.query,
                metrics: deps.metrics,
                clock,
                host,
                config,
                table: Mutex::new(LaunchTable::new()),
            }),
        }
    }

    pub fn host(&self) -> &HostIdentity {
        &self.inner.host
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.inner.config
    }

    pub fn metrics(&self) -> &M {
        &self.inner.metrics
    }

    /// Try to start an agent for `job_id`.
    ///
    /// Safe to call concurrently; the capacity check and the slot
    /// reservation happen under one lock, so concurrent calls never admit
    /// more than `max_jobs_per_host` jobs together.
    pub async fn launch(&self, job_id: JobId) -> LaunchOutcome {
        let shared = &*self.inner;

        // A draining host rejects everything, whatever the id.
        let max = shared.config.max_jobs_per_host();
        if max == 0 {
            let current_count = shared.table.lock().len();
            return self.reject_capacity(&job_id, current_count, max, names::REASON_DRAIN);
        }

        if let Err(reason) = job_id.check_positional() {
            tracing::warn!(reason = %reason, "rejecting launch");
            shared.metrics.increment(names::REJECTED_INVALID, &[]);
            return LaunchOutcome::RejectedInvalidConfig { reason };
        }

        // Early out so duplicates don't cost a query round trip.
        // try_reserve re-checks under the same lock as the capacity count.
        if shared.table.lock().contains(&job_id) {
            return self.duplicate(job_id);
        }

        let remote = match shared.query.count_active_jobs(shared.host.address()).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(
                    job_id = %job_id,
                    error = %e,
                    "running-job query failed, treating host as full"
                );
                return self.reject_capacity(&job_id, max, max, names::REASON_QUERY_FAILED);
            }
        };

        let reservation = match Reservation::acquire(&shared.table, &job_id, remote, max) {
            Ok(reservation) => reservation,
            Err(Refusal::Duplicate) => return self.duplicate(job_id),
            Err(Refusal::Full { current_count }) => {
                return self.reject_capacity(&job_id, current_count, max, names::REASON_CAPACITY);
            }
        };

        let command = AgentCommand::build(&job_id, &shared.host, &shared.config);
        tracing::debug!(job_id = %job_id, %command, remote, "starting agent");

        let timeout = shared.config.launch_timeout();
        let started_at = shared.clock.now();
        let start = Instant::now();
        let result =
            tokio::time::timeout(timeout, shared.executor.start(job_id.as_str(), &command)).await;
        let elapsed = start.elapsed();
        let elapsed_ms = elapsed.as_millis() as u64;

        let cause = match result {
            Ok(Ok(handle)) => {
                let pid = handle.pid();
                reservation.commit(handle, started_at);
                shared.metrics.increment(names::ADMITTED, &[]);
                shared.metrics.record_duration(
                    names::START_LATENCY,
                    elapsed,
                    &[(names::TAG_OUTCOME, "admitted")],
                );
                tracing::info!(job_id = %job_id, ?pid, elapsed_ms, "agent started");
                return LaunchOutcome::Admitted { job_id };
            }
            Ok(Err(e)) => LaunchFailure::Start(e),
            Err(_) => LaunchFailure::Timeout(timeout),
        };

        drop(reservation);
        shared
            .metrics
            .increment(names::FAILED, &[(names::TAG_CAUSE, cause.label())]);
        shared.metrics.record_duration(
            names::START_LATENCY,
            elapsed,
            &[(names::TAG_OUTCOME, "failed")],
        );
        tracing::error!(job_id = %job_id, elapsed_ms, error = %cause, "agent failed to start");
        LaunchOutcome::LaunchFailed { job_id, cause }
    }

    /// Current state of a tracked agent.
    ///
    /// Polls the process; if it has exited the entry is removed (as the
    /// observer would) and `None` is returned. Jobs still starting are not
    /// reported.
    pub fn tracked(&self, job_id: &JobId) -> Option<JobStatus> {
        let now = self.inner.clock.now();
        let (launch, exit) = {
            let mut table = self.inner.table.lock();
            let launch = table.get(job_id)?;
            let status = job_status(launch, now);
            let exit = match launch.handle.try_exit() {
                Ok(Some(exit)) => exit,
                Ok(None) => return Some(status),
                Err(e) => {
                    tracing::warn!(job_id = %job_id, error = %e, "cannot observe agent");
                    return Some(status);
                }
            };
            (table.remove(job_id)?, exit)
        };
        self.record_exit(
            &launch.job_id,
            launch.handle.pid(),
            exit,
            age(launch.started_at, now),
        );
        None
    }

    /// Ask a tracked agent to stop.
    ///
    /// Returns once the kill has been sent; the entry is removed when the
    /// exit is observed.
    pub fn terminate(&self, job_id: &JobId) -> Result<(), LauncherError> {
        let table = self.inner.table.lock();
        let launch = table
            .get(job_id)
            .ok_or_else(|| LauncherError::NotTracked(job_id.clone()))?;
        launch.handle.kill()?;
        tracing::info!(job_id = %job_id, pid = ?launch.handle.pid(), "terminate requested");
        Ok(())
    }

    /// Snapshot of the tracking table
    pub fn status(&self) -> LauncherStatus {
        let now = self.inner.clock.now();
        let table = self.inner.table.lock();
        let mut jobs: Vec<JobStatus> = table.running().map(|l| job_status(l, now)).collect();
        jobs.sort_by(|a, b| a.job_id.cmp(&b.job_id));
        LauncherStatus {
            max_jobs_per_host: self.inner.config.max_jobs_per_host(),
            running: jobs.len(),
            reserved: table.reserved(),
            jobs,
        }
    }

    fn duplicate(&self, job_id: JobId) -> LaunchOutcome {
        let cause = LaunchFailure::DuplicateJob;
        self.inner
            .metrics
            .increment(names::FAILED, &[(names::TAG_CAUSE, cause.label())]);
        tracing::warn!(job_id = %job_id, "job is already tracked");
        LaunchOutcome::LaunchFailed { job_id, cause }
    }

    fn reject_capacity(
        &self,
        job_id: &JobId,
        current_count: usize,
        max: usize,
        reason: &str,
    ) -> LaunchOutcome {
        self.inner
            .metrics
            .increment(names::REJECTED_CAPACITY, &[(names::TAG_REASON, reason)]);
        tracing::info!(job_id = %job_id, current_count, max, reason, "launch rejected");
        LaunchOutcome::RejectedCapacity { current_count, max }
    }
}

fn job_status<H: ProcessHandle>(launch: &TrackedLaunch<H>, now: Instant) -> JobStatus {
    JobStatus {
        job_id: launch.job_id.clone(),
        pid: launch.handle.pid(),
        age: age(launch.started_at, now),
    }
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
