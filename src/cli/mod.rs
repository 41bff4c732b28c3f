//! CLI entrypoint module structure.
use anyhow::Result;

use crate::tools::consul::{advertised_tools, ToolListing};

pub mod args;
pub mod profile;

pub use args::{CliCommand, LaunchProfileArgs, ParsedCommand};
pub use profile::{build_launch_args, LaunchProfile, TRANSPORT};

/// Execute CLI command mode and return a user-facing result payload.
pub fn execute_cli_command(command: CliCommand) -> Result<String> {
    match command {
        CliCommand::Tools => {
            let listing = advertised_tools()
                .iter()
                .map(ToolListing::from)
                .collect::<Vec<_>>();
            Ok(serde_json::to_string_pretty(&listing)?)
        }
    }
}
