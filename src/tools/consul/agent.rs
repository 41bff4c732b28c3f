//! Agent introspection tools: `agent_members`, `agent_self`.
use schemars::JsonSchema;
use serde::Deserialize;

use super::{args::ToolArguments, common::ScopeOptions};

/// Input for `agent_members`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct AgentMembersArgs {
    /// Return WAN members instead of LAN
    #[serde(default)]
    pub wan: bool,
    #[serde(flatten)]
    pub options: ScopeOptions,
}

impl ToolArguments for AgentMembersArgs {}
