use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8500;
const MAX_TIMEOUT_SECS: u64 = 600;

/// Connection settings for the Consul agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsulSection {
    pub host: String,
    pub port: u16,
    /// Use HTTPS instead of HTTP.
    pub secure: bool,
    /// Default ACL token, sent unless a tool call supplies its own.
    pub token: Option<String>,
    /// HTTP client timeout; `None` leaves requests unbounded.
    pub timeout_secs: Option<u64>,
}

impl ConsulSection {
    pub const fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port)
    }
}

impl Default for ConsulSection {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            secure: false,
            token: None,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawConsulSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub secure: Option<bool>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Command-line values layered over the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsulOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub secure: Option<bool>,
    pub token: Option<String>,
    pub timeout_secs: Option<u32>,
}

pub fn parse_consul_section(raw: RawConsulSection) -> Result<ConsulSection, ConfigError> {
    let host = raw
        .host
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    validate_host(&host)?;

    let port = raw.port.unwrap_or(DEFAULT_PORT);
    validate_port(port)?;

    let token = raw
        .token
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    if let Some(timeout) = raw.timeout_secs {
        validate_timeout(timeout)?;
    }

    Ok(ConsulSection {
        host,
        port,
        secure: raw.secure.unwrap_or(false),
        token,
        timeout_secs: raw.timeout_secs,
    })
}

fn validate_host(host: &str) -> Result<(), ConfigError> {
    if host.is_empty() {
        return Err(ConfigError::InvalidField {
            field: "host",
            message: "Host cannot be empty".into(),
        });
    }
    if host.contains("://") || host.contains('/') {
        return Err(ConfigError::InvalidField {
            field: "host",
            message: format!("Provide a bare host name without scheme or path: {host}"),
        });
    }
    Ok(())
}

fn validate_port(port: u16) -> Result<(), ConfigError> {
    if port == 0 {
        return Err(ConfigError::InvalidField {
            field: "port",
            message: "Use a port in the range 1-65535".into(),
        });
    }
    Ok(())
}

fn validate_timeout(secs: u64) -> Result<(), ConfigError> {
    if !(1..=MAX_TIMEOUT_SECS).contains(&secs) {
        return Err(ConfigError::InvalidField {
            field: "timeout_secs",
            message: format!("Specify a value between 1 and {MAX_TIMEOUT_SECS} seconds"),
        });
    }
    Ok(())
}
