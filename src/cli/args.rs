//! CLI argument definitions and `LaunchProfile` construction.
use clap::{Parser, Subcommand};

use super::{build_launch_args, LaunchProfile};
use crate::server::config::ConsulOverrides;

/// Parsed command intent from CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    RunServer(LaunchProfile),
    Cli(CliCommand),
}

/// Top-level optional CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Print the advertised tool descriptors as JSON and exit.
    #[command(about = "Print the advertised MCP tools as JSON")]
    Tools,
}

/// Command-line arguments. Each connection flag overrides its `CONSUL_*` variable.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Consul MCP server (stdio)",
    long_about = None
)]
pub struct LaunchProfileArgs {
    /// Consul agent host (overrides CONSUL_HOST).
    #[arg(long)]
    pub host: Option<String>,
    /// Consul HTTP API port (overrides CONSUL_PORT).
    #[arg(long)]
    pub port: Option<u16>,
    /// Connect over HTTPS (overrides CONSUL_SECURE). `--secure=false` forces HTTP.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub secure: Option<bool>,
    /// Default ACL token (overrides CONSUL_TOKEN).
    #[arg(long)]
    pub token: Option<String>,
    /// HTTP request timeout in seconds (overrides CONSUL_TIMEOUT_SECS).
    #[arg(long = "timeout-secs")]
    pub timeout_secs: Option<u32>,
    /// Optional CLI command mode.
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

impl LaunchProfileArgs {
    pub fn overrides(&self) -> ConsulOverrides {
        ConsulOverrides {
            host: self.host.clone(),
            port: self.port,
            secure: self.secure,
            token: self.token.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Build a `LaunchProfile` from CLI args.
    pub fn build(self) -> LaunchProfile {
        let overrides = self.overrides();
        let launch_args = build_launch_args(&overrides);
        LaunchProfile {
            overrides,
            launch_args,
        }
    }

    /// Parse CLI args into either server launch mode or utility command mode.
    pub fn into_command(self) -> ParsedCommand {
        match self.command {
            Some(command) => ParsedCommand::Cli(command),
            None => ParsedCommand::RunServer(self.build()),
        }
    }
}
