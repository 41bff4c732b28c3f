use crate::server::config::ServerConfig;

/// Build the `ServerInfo.instructions` string shown to MCP clients.
pub fn build_instructions(config: &ServerConfig) -> String {
    format!(
        "Consul tools backed by the agent at {addr}. Read tools accept optional `dc` and `token`; KV reads also accept `consistent` or `stale`. Results are JSON text; a missing key returns `null`.",
        addr = config.consul.base_url()
    )
}
