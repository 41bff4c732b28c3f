use std::{process::ExitCode, sync::Arc};

use anyhow::Error;
use rmcp::ServiceExt;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{
    cli::{LaunchProfile, TRANSPORT},
    lib::{
        consul::ConsulBackend,
        telemetry::{emit_runtime_mode, RuntimeModeTelemetry},
    },
    server::{
        config::ServerConfig,
        runtime::{build_instructions, ConsulServer},
    },
    tools::consul::advertised_tools,
};

/// Bundles a runtime error message with an exit code.
#[derive(Debug)]
pub struct RuntimeExit {
    message: String,
    exit_code: ExitCode,
}

impl RuntimeExit {
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: format!("{err:?}"),
            exit_code: ExitCode::FAILURE,
        }
    }

    pub fn report(self) -> ExitCode {
        eprintln!("{}", self.message);
        self.exit_code
    }
}

/// Start the MCP server on stdio and serve until the client disconnects.
pub async fn run_server(profile: LaunchProfile, config: ServerConfig) -> Result<(), RuntimeExit> {
    let instructions = build_instructions(&config);
    let server = ConsulServer::new(&config, instructions).map_err(RuntimeExit::from_error)?;

    let consul_addr = config.consul.base_url();
    emit_runtime_mode(&RuntimeModeTelemetry {
        transport: TRANSPORT,
        consul_addr: &consul_addr,
        secure: config.consul.secure,
        default_token: config.consul.token.is_some(),
        advertised_tools: advertised_tools().len(),
        launch_args: &profile.launch_args,
    });

    let _leader_check = spawn_leader_check(server.backend());
    run_stdio(server).await
}

/// Ask the agent for its leader once and log the outcome. Never fails startup.
pub fn spawn_leader_check(backend: Arc<dyn ConsulBackend>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match backend.status_leader().await {
            Ok(leader) => info!(
                target: "consul_mcp::runtime",
                leader = %leader,
                "Connected to Consul"
            ),
            Err(err) => warn!(
                target: "consul_mcp::runtime",
                error = %err,
                "Consul is not reachable yet; tool calls will report errors until it is"
            ),
        }
    })
}

async fn run_stdio(server: ConsulServer) -> Result<(), RuntimeExit> {
    let running = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(RuntimeExit::from_error)?;
    running.waiting().await.map_err(RuntimeExit::from_error)?;
    Ok(())
}
