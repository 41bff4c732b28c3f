use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Errors that can occur while loading or validating the Consul connection settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to collect settings from the environment or command-line overrides.
    #[error("Failed to read Consul settings: {source}")]
    Load {
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize the collected settings.
    #[error("Failed to parse Consul settings: {source}")]
    Parse {
        #[source]
        source: ConfigLoaderError,
    },
    /// Field failed validation.
    #[error("Consul setting `{field}` is invalid: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    pub fn from_load_error(source: ConfigLoaderError) -> Self {
        Self::Load { source }
    }

    pub fn from_parse_error(source: ConfigLoaderError) -> Self {
        Self::Parse { source }
    }
}

/// Failures raised while talking to the Consul HTTP API.
#[derive(Debug, Error)]
pub enum ConsulError {
    #[error("Failed to build Consul HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to Consul failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("Consul responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Failed to decode Consul response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}
