//! Command dispatch: bridges CLI args -> engine calls -> output formatting.

pub mod build;
pub mod config_cmd;
pub mod devices;
pub mod plan;
pub mod ports;
pub mod simulate;
pub mod util;
pub mod wifi;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a sandbox command to the appropriate handler.
pub fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Plan(args) => plan::handle(&args, global),
        Command::Build(args) => build::handle(args, global),
        Command::Simulate(args) => simulate::handle(&args, global),
        Command::Devices(args) => devices::handle(args, global),
        Command::Ports(args) => ports::handle(args, global),
        Command::Wifi(args) => wifi::handle(args, global),
        Command::Config(args) => config_cmd::handle(&args, global),
        // Completions need the clap command tree and are handled in main
        Command::Completions(_) => Ok(()),
    }
}
