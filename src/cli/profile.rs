//! LaunchProfile: the resolved command-line settings for a server run.
use crate::server::config::ConsulOverrides;

/// Only stdio is served; the value is still logged so runs are self-describing.
pub const TRANSPORT: &str = "stdio";

/// Resolved launch profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchProfile {
    pub overrides: ConsulOverrides,
    pub launch_args: Vec<String>,
}

/// Build launch arguments suitable for reproduction/logging. The token value is masked.
pub fn build_launch_args(overrides: &ConsulOverrides) -> Vec<String> {
    let mut args = vec![format!("--transport={TRANSPORT}")];
    if let Some(host) = &overrides.host {
        args.push(format!("--host={host}"));
    }
    if let Some(port) = overrides.port {
        args.push(format!("--port={port}"));
    }
    match overrides.secure {
        Some(true) => args.push("--secure".to_string()),
        Some(false) => args.push("--secure=false".to_string()),
        None => {}
    }
    if overrides.token.is_some() {
        args.push("--token=***".to_string());
    }
    if let Some(timeout) = overrides.timeout_secs {
        args.push(format!("--timeout-secs={timeout}"));
    }
    args
}
