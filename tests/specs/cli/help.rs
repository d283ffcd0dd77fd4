//! Help and usage specs

use crate::prelude::*;

#[test]
fn no_subcommand_prints_help() {
    cli()
        .passes()
        .stdout_has("Usage: hatch")
        .stdout_has("check")
        .stdout_has("launch");
}

#[test]
fn launch_help_lists_flags() {
    cli()
        .args(&["launch", "--help"])
        .passes()
        .stdout_has("--wait")
        .stdout_has("--metrics")
        .stdout_has("--config");
}

#[test]
fn launch_without_config_explains() {
    cli()
        .args(&["launch", "job-1"])
        .fails()
        .stderr_has("no config file given");
}
