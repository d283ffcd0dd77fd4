// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hatch launch`: admit and start agents for one or more jobs.

use anyhow::Result;
use hatch_adapters::{LocalProcessExecutor, PrometheusMetrics, TracedExecutor};
use hatch_core::{IdGen, JobId, SystemClock, UuidIdGen};
use hatch_engine::{LaunchOutcome, LauncherDeps, LocalAgentLauncher};
use std::path::PathBuf;

use crate::exit_error::ExitError;
use crate::output::{outcome_line, OutcomeRecord, OutputFormat};
use crate::query::HostJobQuery;

/// Exit code when at least one launch was not admitted
const EXIT_NOT_ADMITTED: i32 = 2;

type Launcher =
    LocalAgentLauncher<TracedExecutor<LocalProcessExecutor>, HostJobQuery, PrometheusMetrics, SystemClock>;

#[derive(clap::Args)]
pub struct LaunchArgs {
    /// Launcher config file (TOML)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Keep running until every admitted agent has exited
    #[arg(long)]
    pub wait: bool,

    /// Print Prometheus metrics when done
    #[arg(long)]
    pub metrics: bool,

    /// Number of jobs to launch with generated IDs when none are given
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    /// Job IDs to launch (generated if omitted)
    pub job_ids: Vec<String>,
}

pub async fn handle(args: LaunchArgs, format: OutputFormat) -> Result<()> {
    let path = super::config_path(args.config)?;
    let config = super::load_config(&path)?;

    let executor = match config.launcher.output_dir() {
        Some(dir) => LocalProcessExecutor::with_output_dir(dir),
        None => LocalProcessExecutor::new(),
    };
    let metrics = PrometheusMetrics::new();
    let launcher: Launcher = LocalAgentLauncher::new(
        LauncherDeps {
            executor: TracedExecutor::new(executor),
            query: HostJobQuery::from_config(&config.query),
            metrics: metrics.clone(),
        },
        config.host,
        config.launcher,
        SystemClock,
    );
    let observer = launcher.spawn_observer();

    let job_ids = job_ids(args.job_ids, args.count, &UuidIdGen);
    let outcomes = launch_all(&launcher, &job_ids).await?;

    let mut not_admitted = 0;
    for (job_id, outcome) in job_ids.iter().zip(&outcomes) {
        if !outcome.is_admitted() {
            not_admitted += 1;
        }
        match format {
            OutputFormat::Text => println!("{}", outcome_line(job_id.as_str(), outcome)),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string(&OutcomeRecord::new(job_id.as_str(), outcome))?
            ),
        }
    }

    if args.wait {
        wait_for_exit(&launcher).await;
    }
    observer.shutdown().await;

    if args.metrics {
        print!("{}", metrics.encode_text()?);
    }

    if not_admitted > 0 {
        return Err(ExitError::new(EXIT_NOT_ADMITTED, String::new()).into());
    }
    Ok(())
}

pub(crate) fn job_ids(given: Vec<String>, count: usize, ids: &impl IdGen) -> Vec<JobId> {
    if given.is_empty() {
        (0..count).map(|_| JobId::new(ids.next())).collect()
    } else {
        given.into_iter().map(JobId::new).collect()
    }
}

/// Launch every job concurrently; outcomes are returned in input order.
async fn launch_all(launcher: &Launcher, job_ids: &[JobId]) -> Result<Vec<LaunchOutcome>> {
    let tasks: Vec<_> = job_ids
        .iter()
        .cloned()
        .map(|job_id| {
            let launcher = launcher.clone();
            tokio::spawn(async move { launcher.launch(job_id).await })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(tasks.len());
    for task in tasks {
        outcomes.push(task.await?);
    }
    Ok(outcomes)
}

async fn wait_for_exit(launcher: &Launcher) {
    let poll = launcher.config().poll_interval();
    loop {
        let status = launcher.status();
        if status.running == 0 && status.reserved == 0 {
            break;
        }
        tracing::debug!(%status, "waiting for agents");
        tokio::time::sleep(poll).await;
    }
}

#[cfg(test)]
#[path = "launch_tests.rs"]
mod tests;
