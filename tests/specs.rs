//! Behavioral specifications for the hatch CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, exit codes and the files agents leave behind.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/check.rs"]
mod cli_check;
#[path = "specs/cli/help.rs"]
mod cli_help;
#[path = "specs/cli/launch.rs"]
mod cli_launch;
