//! Options shared by most Consul tools (`dc`, `token`, `consistent`, `stale`).
use schemars::JsonSchema;
use serde::Deserialize;

use super::args::{ArgumentError, ToolArguments};
use crate::lib::consul::{Consistency, QueryOptions};

/// `dc` and `token`, accepted by every tool that addresses a datacenter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct ScopeOptions {
    /// Datacenter
    pub dc: Option<String>,
    /// ACL token
    pub token: Option<String>,
}

impl ScopeOptions {
    pub fn query(&self) -> QueryOptions {
        QueryOptions {
            datacenter: self.dc.clone(),
            token: self.token.clone(),
            consistency: Consistency::Default,
        }
    }
}

/// Scope plus the read-consistency flags accepted by the key/value reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct ReadOptions {
    #[serde(flatten)]
    pub scope: ScopeOptions,
    /// Require strong consistency
    #[serde(default)]
    pub consistent: bool,
    /// Use stale data
    #[serde(default)]
    pub stale: bool,
}

impl ReadOptions {
    pub fn validate(&self) -> Result<(), ArgumentError> {
        if self.consistent && self.stale {
            return Err(ArgumentError::Conflict {
                first: "consistent",
                second: "stale",
            });
        }
        Ok(())
    }

    /// Assumes `validate` passed; `consistent` wins otherwise.
    pub fn query(&self) -> QueryOptions {
        let consistency = if self.consistent {
            Consistency::Consistent
        } else if self.stale {
            Consistency::Stale
        } else {
            Consistency::Default
        };
        QueryOptions {
            consistency,
            ..self.scope.query()
        }
    }
}

/// Arguments for tools that take nothing but `dc` and `token`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct ScopedArgs {
    #[serde(flatten)]
    pub options: ScopeOptions,
}

impl ToolArguments for ScopedArgs {}

/// Input for tools that take no arguments at all. Unknown members are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct NoArguments {}

impl ToolArguments for NoArguments {}
