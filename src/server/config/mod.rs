//! Load and validate the Consul connection settings.
use config::{builder::DefaultState, ConfigBuilder, Environment};
use tracing::{error, info};

use crate::lib::errors::ConfigError;

pub mod consul;
pub mod telemetry;

pub use consul::{
    parse_consul_section, ConsulOverrides, ConsulSection, RawConsulSection, DEFAULT_HOST,
    DEFAULT_PORT,
};

/// Prefix of the environment variables read at startup (`CONSUL_HOST`, `CONSUL_PORT`, ...).
pub const ENV_PREFIX: &str = "CONSUL";

/// Top-level configuration container.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub consul: ConsulSection,
}

impl ServerConfig {
    /// Read `CONSUL_*` environment variables, then apply command-line overrides.
    ///
    /// Variables stay strings until deserialization so that `CONSUL_TOKEN` and
    /// `CONSUL_HOST` keep digits and leading zeros verbatim.
    pub fn load(overrides: &ConsulOverrides) -> Result<Self, ConfigError> {
        Self::load_with_environment(Environment::with_prefix(ENV_PREFIX), overrides)
    }

    /// Read `CONSUL_*` environment variables only.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        Self::load(&ConsulOverrides::default())
    }

    pub(crate) fn load_with_environment(
        environment: Environment,
        overrides: &ConsulOverrides,
    ) -> Result<Self, ConfigError> {
        info!(
            target: "consul_mcp::config",
            prefix = ENV_PREFIX,
            "Starting configuration load"
        );

        let builder = config::Config::builder().add_source(environment);
        let document = apply_overrides(builder, overrides)
            .and_then(|builder| builder.build())
            .map_err(|err| {
                let error = ConfigError::from_load_error(err);
                error!(
                    target: "consul_mcp::config",
                    reason = %error,
                    "Failed to read Consul settings"
                );
                error
            })?;

        let raw: RawConsulSection = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(err);
            error!(
                target: "consul_mcp::config",
                reason = %error,
                "Failed to parse Consul settings"
            );
            error
        })?;

        let config = Self::from_raw(raw).map_err(|err| {
            error!(
                target: "consul_mcp::config",
                reason = %err,
                "Failed to validate Consul settings"
            );
            err
        })?;

        telemetry::log_loaded(&config);
        Ok(config)
    }

    fn from_raw(raw: RawConsulSection) -> Result<Self, ConfigError> {
        Ok(Self {
            consul: parse_consul_section(raw)?,
        })
    }
}

fn apply_overrides(
    builder: ConfigBuilder<DefaultState>,
    overrides: &ConsulOverrides,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    builder
        .set_override_option("host", overrides.host.clone())?
        .set_override_option("port", overrides.port.map(i64::from))?
        .set_override_option("secure", overrides.secure)?
        .set_override_option("token", overrides.token.clone())?
        .set_override_option("timeout_secs", overrides.timeout_secs.map(i64::from))
}
