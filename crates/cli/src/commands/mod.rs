// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod check;
pub mod launch;

use anyhow::{Context, Result};
use hatch_core::HatchConfig;
use std::path::{Path, PathBuf};

/// `--config`, falling back to `HATCH_CONFIG`
pub(crate) fn config_path(arg: Option<PathBuf>) -> Result<PathBuf> {
    arg.or_else(crate::env::config_path)
        .context("no config file given (use --config or set HATCH_CONFIG)")
}

pub(crate) fn load_config(path: &Path) -> Result<HatchConfig> {
    HatchConfig::load(path).with_context(|| format!("invalid configuration in {}", path.display()))
}
