// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hatch check`: validate a config file without launching anything.

use anyhow::Result;
use hatch_core::{format_elapsed, HatchConfig};
use serde::Serialize;
use std::path::PathBuf;

use crate::output::OutputFormat;
use crate::query::HostJobQuery;

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Launcher config file (TOML)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    host: &'a str,
    rpc_port: u16,
    max_jobs_per_host: usize,
    executable: String,
    extra_args: &'a [String],
    launch_timeout_ms: u64,
    query: &'static str,
}

pub fn handle(args: CheckArgs, format: OutputFormat) -> Result<()> {
    let path = super::config_path(args.config)?;
    let config = super::load_config(&path)?;

    match format {
        OutputFormat::Text => print!("{}", render(&config)),
        OutputFormat::Json => {
            let report = CheckReport {
                host: config.host.address(),
                rpc_port: config.host.rpc_port(),
                max_jobs_per_host: config.launcher.max_jobs_per_host(),
                executable: config.launcher.executable().display().to_string(),
                extra_args: config.launcher.extra_args(),
                launch_timeout_ms: config.launcher.launch_timeout().as_millis() as u64,
                query: HostJobQuery::from_config(&config.query).describe(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

pub(crate) fn render(config: &HatchConfig) -> String {
    let launcher = &config.launcher;
    let mut out = String::new();
    out.push_str(&format!("host: {}\n", config.host));
    out.push_str(&format!("max jobs per host: {}", launcher.max_jobs_per_host()));
    if launcher.max_jobs_per_host() == 0 {
        out.push_str(" (drain: every launch is rejected)");
    }
    out.push('\n');
    out.push_str(&format!("executable: {}\n", launcher.executable().display()));
    if !launcher.extra_args().is_empty() {
        out.push_str(&format!("extra args: {}\n", launcher.extra_args().join(" ")));
    }
    out.push_str(&format!(
        "launch timeout: {}\n",
        format_elapsed(launcher.launch_timeout())
    ));
    match &config.query.command {
        Some(command) => out.push_str(&format!("running-job query: {}\n", command)),
        None => out.push_str("running-job query: none (standalone)\n"),
    }
    out
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
