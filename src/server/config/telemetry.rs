use tracing::info;

use super::ServerConfig;

pub fn log_loaded(config: &ServerConfig) {
    info!(
        target: "consul_mcp::config",
        host = %config.consul.host,
        port = config.consul.port,
        secure = config.consul.secure,
        default_token = config.consul.token.is_some(),
        timeout_secs = config.consul.timeout_secs,
        "Consul settings loaded successfully"
    );
}
