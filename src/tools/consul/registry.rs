//! Static table of Consul tools and their JSON-schema input shapes.
use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde::Serialize;

use super::{
    agent::AgentMembersArgs,
    args::ToolArguments,
    catalog::{NodeArgs, ServiceNodesArgs},
    common::{NoArguments, ScopedArgs},
    health::{HealthServiceArgs, HealthStateArgs, ServiceArgs},
    kv::{KvGetArgs, KvKeysArgs, KvSetArgs},
};

/// Every tool the server can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    KvGet,
    KvKeys,
    KvSet,
    StatusLeader,
    StatusPeers,
    AgentMembers,
    AgentSelf,
    CatalogDatacenters,
    CatalogNodes,
    CatalogNodeServices,
    CatalogServices,
    CatalogServiceNodes,
    HealthNode,
    HealthChecks,
    HealthService,
    HealthState,
}

impl ToolKind {
    /// All tools in listing order.
    pub const ALL: [ToolKind; 16] = [
        ToolKind::KvGet,
        ToolKind::KvKeys,
        ToolKind::KvSet,
        ToolKind::StatusLeader,
        ToolKind::StatusPeers,
        ToolKind::AgentMembers,
        ToolKind::AgentSelf,
        ToolKind::CatalogDatacenters,
        ToolKind::CatalogNodes,
        ToolKind::CatalogNodeServices,
        ToolKind::CatalogServices,
        ToolKind::CatalogServiceNodes,
        ToolKind::HealthNode,
        ToolKind::HealthChecks,
        ToolKind::HealthService,
        ToolKind::HealthState,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            ToolKind::KvGet => "kv_get",
            ToolKind::KvKeys => "kv_keys",
            ToolKind::KvSet => "kv_set",
            ToolKind::StatusLeader => "status_leader",
            ToolKind::StatusPeers => "status_peers",
            ToolKind::AgentMembers => "agent_members",
            ToolKind::AgentSelf => "agent_self",
            ToolKind::CatalogDatacenters => "catalog_datacenters",
            ToolKind::CatalogNodes => "catalog_nodes",
            ToolKind::CatalogNodeServices => "catalog_node_services",
            ToolKind::CatalogServices => "catalog_services",
            ToolKind::CatalogServiceNodes => "catalog_service_nodes",
            ToolKind::HealthNode => "health_node",
            ToolKind::HealthChecks => "health_checks",
            ToolKind::HealthService => "health_service",
            ToolKind::HealthState => "health_state",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub const fn description(&self) -> &'static str {
        match self {
            ToolKind::KvGet => "Get a key-value pair from Consul KV store",
            ToolKind::KvKeys => "List keys in Consul KV store with given prefix",
            ToolKind::KvSet => "Set a key-value pair in Consul KV store",
            ToolKind::StatusLeader => "Get the current Raft leader",
            ToolKind::StatusPeers => "Get the current Raft peer set",
            ToolKind::AgentMembers => "Get cluster members as seen by the agent",
            ToolKind::AgentSelf => "Get agent configuration and member information",
            ToolKind::CatalogDatacenters => "List known datacenters",
            ToolKind::CatalogNodes => "List nodes in datacenter",
            ToolKind::CatalogNodeServices => "List services provided by a node",
            ToolKind::CatalogServices => "List services in datacenter",
            ToolKind::CatalogServiceNodes => "List nodes providing a service",
            ToolKind::HealthNode => "Get health information for a node",
            ToolKind::HealthChecks => "Get health checks for a service",
            ToolKind::HealthService => "Get nodes and health info for a service",
            ToolKind::HealthState => "Get checks in a given state",
        }
    }

    /// Whether `tools/list` includes the tool. `kv_set` is callable but unlisted.
    pub const fn is_advertised(&self) -> bool {
        !matches!(self, ToolKind::KvSet)
    }

    /// Schema derived from the tool's argument type.
    pub fn input_schema(&self) -> Arc<JsonObject> {
        match self {
            ToolKind::KvGet => KvGetArgs::input_schema(),
            ToolKind::KvKeys => KvKeysArgs::input_schema(),
            ToolKind::KvSet => KvSetArgs::input_schema(),
            ToolKind::AgentMembers => AgentMembersArgs::input_schema(),
            ToolKind::CatalogNodes | ToolKind::CatalogServices => ScopedArgs::input_schema(),
            ToolKind::CatalogNodeServices | ToolKind::HealthNode => NodeArgs::input_schema(),
            ToolKind::CatalogServiceNodes => ServiceNodesArgs::input_schema(),
            ToolKind::HealthChecks => ServiceArgs::input_schema(),
            ToolKind::HealthService => HealthServiceArgs::input_schema(),
            ToolKind::HealthState => HealthStateArgs::input_schema(),
            ToolKind::StatusLeader
            | ToolKind::StatusPeers
            | ToolKind::AgentSelf
            | ToolKind::CatalogDatacenters => NoArguments::input_schema(),
        }
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            kind: *self,
            name: self.name(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

/// Name, description, and input shape of one tool.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub kind: ToolKind,
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Arc<JsonObject>,
}

impl ToolDescriptor {
    pub fn property_names(&self) -> Vec<&str> {
        self.input_schema
            .get("properties")
            .and_then(|properties| properties.as_object())
            .map(|properties| properties.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn required_fields(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(|required| required.as_array())
            .map(|required| required.iter().filter_map(|name| name.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn to_tool(&self) -> Tool {
        Tool::new(self.name, self.description, self.input_schema.clone())
    }
}

/// Tools listed by `tools/list`, in order.
pub fn advertised_tools() -> Vec<ToolDescriptor> {
    ToolKind::ALL
        .iter()
        .filter(|kind| kind.is_advertised())
        .map(ToolKind::descriptor)
        .collect()
}

/// JSON shape printed by the `tools` subcommand.
#[derive(Debug, Serialize)]
pub struct ToolListing {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonObject,
}

impl From<&ToolDescriptor> for ToolListing {
    fn from(descriptor: &ToolDescriptor) -> Self {
        Self {
            name: descriptor.name,
            description: descriptor.description,
            input_schema: (*descriptor.input_schema).clone(),
        }
    }
}
