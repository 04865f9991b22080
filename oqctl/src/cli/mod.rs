//! Command Line Interface for oqctl
// (c) 2026 oqctl developers
mod args;
pub(crate) use args::{CliArgs, DeviceCommand};
mod cli_main;
pub mod styles;
pub use cli_main::cli;
