//! Typed tool inputs: every tool's arguments deserialize from the raw `tools/call`
//! object and publish their JSON Schema from the same derive.
use std::sync::Arc;

use rmcp::{handler::server::common::cached_schema_for_type, model::JsonObject};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Raw argument object as received in `tools/call`.
pub type ArgumentMap = Map<String, Value>;

/// Argument validation failures.
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// Missing field, wrong type, or a value outside the declared set.
    #[error("{0}")]
    Invalid(#[from] serde_json::Error),
    #[error("arguments `{first}` and `{second}` cannot both be set")]
    Conflict {
        first: &'static str,
        second: &'static str,
    },
}

/// A tool's input shape.
pub trait ToolArguments: DeserializeOwned + JsonSchema + 'static {
    /// Cross-field checks that the derived shape cannot express.
    fn validate(&self) -> Result<(), ArgumentError> {
        Ok(())
    }

    /// Deserialize and validate. A `null` member counts as absent, and a missing
    /// argument object is treated as `{}`.
    fn parse(arguments: Option<&ArgumentMap>) -> Result<Self, ArgumentError> {
        let present = arguments
            .into_iter()
            .flatten()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect::<ArgumentMap>();
        let parsed: Self = serde_json::from_value(Value::Object(present))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// JSON Schema advertised as the tool's `inputSchema`.
    fn input_schema() -> Arc<JsonObject> {
        cached_schema_for_type::<Self>()
    }
}
