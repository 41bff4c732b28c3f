//! Catalog tools: datacenters, nodes, and services.
use schemars::JsonSchema;
use serde::Deserialize;

use super::{args::ToolArguments, common::ScopeOptions};

/// Input for tools addressed by node name (`catalog_node_services`, `health_node`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct NodeArgs {
    /// Node name
    pub node: String,
    #[serde(flatten)]
    pub options: ScopeOptions,
}

impl ToolArguments for NodeArgs {}

/// Input for `catalog_service_nodes`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct ServiceNodesArgs {
    /// Service name
    pub service: String,
    /// Filter by tag
    pub tag: Option<String>,
    #[serde(flatten)]
    pub options: ScopeOptions,
}

impl ToolArguments for ServiceNodesArgs {}
