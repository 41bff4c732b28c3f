//! Telemetry initialization and tool-call span helpers.

use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Initialize `tracing` and format developer logs on stderr.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Outcome recorded when a tool call span closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Ok,
    Error,
}

impl CallStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Ok => "ok",
            CallStatus::Error => "error",
        }
    }
}

/// Span covering one `tools/call` request.
pub struct ToolCallSpan {
    span: Span,
    started_at: Instant,
    call_id: Uuid,
    tool: String,
}

impl ToolCallSpan {
    pub fn start(tool: &str) -> Self {
        let call_id = Uuid::new_v4();
        let span = info_span!(
            target: "consul_mcp::tools",
            "tool_call",
            %call_id,
            tool
        );
        Self {
            span,
            started_at: Instant::now(),
            call_id,
            tool: tool.to_string(),
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn call_id(&self) -> Uuid {
        self.call_id
    }

    /// Close the span, recording status and elapsed time.
    pub fn finish(self, status: CallStatus) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "consul_mcp::tools",
            call_id = %self.call_id,
            tool = %self.tool,
            status = status.as_str(),
            elapsed_ms = elapsed_ms,
            "Completed tool call"
        );
    }
}

/// Payload for logging MCP runtime state as structured telemetry.
#[derive(Debug, Serialize)]
pub struct RuntimeModeTelemetry<'a> {
    pub transport: &'a str,
    pub consul_addr: &'a str,
    pub secure: bool,
    pub default_token: bool,
    pub advertised_tools: usize,
    pub launch_args: &'a [String],
}

/// Emit runtime mode to `tracing`.
pub fn emit_runtime_mode(telemetry: &RuntimeModeTelemetry<'_>) {
    info!(
        target: "consul_mcp::runtime",
        transport = telemetry.transport,
        consul_addr = telemetry.consul_addr,
        secure = telemetry.secure,
        default_token = telemetry.default_token,
        advertised_tools = telemetry.advertised_tools,
        launch_args = ?telemetry.launch_args,
        "Started MCP server"
    );
}
