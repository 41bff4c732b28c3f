//! Resolve a `tools/call` request to a typed call, run it against the backend, and
//! render the outcome as a call result.
use rmcp::model::{CallToolResult, Content};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn, Instrument};

use super::{
    agent::AgentMembersArgs,
    args::{ArgumentError, ArgumentMap, ToolArguments},
    catalog::{NodeArgs, ServiceNodesArgs},
    common::{NoArguments, ScopedArgs},
    health::{HealthServiceArgs, HealthStateArgs, ServiceArgs},
    kv::{KvGetArgs, KvKeysArgs, KvSetArgs},
    registry::ToolKind,
};
use crate::lib::{
    consul::ConsulBackend,
    errors::ConsulError,
    telemetry::{CallStatus, ToolCallSpan},
};

/// Failures reported back to the caller as error-flagged results.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },
    #[error("Invalid arguments for `{tool}`: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: ArgumentError,
    },
    #[error(transparent)]
    Backend(#[from] ConsulError),
    #[error("failed to render result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A validated call, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    KvGet(KvGetArgs),
    KvKeys(KvKeysArgs),
    KvSet(KvSetArgs),
    StatusLeader,
    StatusPeers,
    AgentMembers(AgentMembersArgs),
    AgentSelf,
    CatalogDatacenters,
    CatalogNodes(ScopedArgs),
    CatalogNodeServices(NodeArgs),
    CatalogServices(ScopedArgs),
    CatalogServiceNodes(ServiceNodesArgs),
    HealthNode(NodeArgs),
    HealthChecks(ServiceArgs),
    HealthService(HealthServiceArgs),
    HealthState(HealthStateArgs),
}

impl ToolCall {
    /// Look up `name` and validate `arguments` against its input shape.
    pub fn parse(name: &str, arguments: Option<&ArgumentMap>) -> Result<Self, ToolError> {
        let kind = ToolKind::from_name(name).ok_or_else(|| ToolError::UnknownTool {
            name: name.to_string(),
        })?;
        Self::parse_kind(kind, arguments).map_err(|source| ToolError::InvalidArguments {
            tool: kind.name(),
            source,
        })
    }

    fn parse_kind(kind: ToolKind, args: Option<&ArgumentMap>) -> Result<Self, ArgumentError> {
        Ok(match kind {
            ToolKind::KvGet => ToolCall::KvGet(KvGetArgs::parse(args)?),
            ToolKind::KvKeys => ToolCall::KvKeys(KvKeysArgs::parse(args)?),
            ToolKind::KvSet => ToolCall::KvSet(KvSetArgs::parse(args)?),
            ToolKind::StatusLeader => {
                NoArguments::parse(args)?;
                ToolCall::StatusLeader
            }
            ToolKind::StatusPeers => {
                NoArguments::parse(args)?;
                ToolCall::StatusPeers
            }
            ToolKind::AgentMembers => ToolCall::AgentMembers(AgentMembersArgs::parse(args)?),
            ToolKind::AgentSelf => {
                NoArguments::parse(args)?;
                ToolCall::AgentSelf
            }
            ToolKind::CatalogDatacenters => {
                NoArguments::parse(args)?;
                ToolCall::CatalogDatacenters
            }
            ToolKind::CatalogNodes => ToolCall::CatalogNodes(ScopedArgs::parse(args)?),
            ToolKind::CatalogNodeServices => ToolCall::CatalogNodeServices(NodeArgs::parse(args)?),
            ToolKind::CatalogServices => ToolCall::CatalogServices(ScopedArgs::parse(args)?),
            ToolKind::CatalogServiceNodes => {
                ToolCall::CatalogServiceNodes(ServiceNodesArgs::parse(args)?)
            }
            ToolKind::HealthNode => ToolCall::HealthNode(NodeArgs::parse(args)?),
            ToolKind::HealthChecks => ToolCall::HealthChecks(ServiceArgs::parse(args)?),
            ToolKind::HealthService => ToolCall::HealthService(HealthServiceArgs::parse(args)?),
            ToolKind::HealthState => ToolCall::HealthState(HealthStateArgs::parse(args)?),
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ToolCall::KvGet(_) => ToolKind::KvGet,
            ToolCall::KvKeys(_) => ToolKind::KvKeys,
            ToolCall::KvSet(_) => ToolKind::KvSet,
            ToolCall::StatusLeader => ToolKind::StatusLeader,
            ToolCall::StatusPeers => ToolKind::StatusPeers,
            ToolCall::AgentMembers(_) => ToolKind::AgentMembers,
            ToolCall::AgentSelf => ToolKind::AgentSelf,
            ToolCall::CatalogDatacenters => ToolKind::CatalogDatacenters,
            ToolCall::CatalogNodes(_) => ToolKind::CatalogNodes,
            ToolCall::CatalogNodeServices(_) => ToolKind::CatalogNodeServices,
            ToolCall::CatalogServices(_) => ToolKind::CatalogServices,
            ToolCall::CatalogServiceNodes(_) => ToolKind::CatalogServiceNodes,
            ToolCall::HealthNode(_) => ToolKind::HealthNode,
            ToolCall::HealthChecks(_) => ToolKind::HealthChecks,
            ToolCall::HealthService(_) => ToolKind::HealthService,
            ToolCall::HealthState(_) => ToolKind::HealthState,
        }
    }

    /// Run the call. Exactly one backend operation is issued.
    pub async fn execute(&self, backend: &dyn ConsulBackend) -> Result<Value, ConsulError> {
        Ok(match self {
            ToolCall::KvGet(args) => {
                backend
                    .kv_get(&args.key, args.kv, &args.options.query())
                    .await?
            }
            ToolCall::KvKeys(args) => Value::from(
                backend
                    .kv_keys(&args.prefix, args.separator.as_deref(), &args.options.query())
                    .await?,
            ),
            ToolCall::KvSet(args) => Value::from(
                backend
                    .kv_set(&args.key, &args.value, &args.write, &args.options.query())
                    .await?,
            ),
            ToolCall::StatusLeader => Value::from(backend.status_leader().await?),
            ToolCall::StatusPeers => Value::from(backend.status_peers().await?),
            ToolCall::AgentMembers(args) => {
                backend
                    .agent_members(args.wan, &args.options.query())
                    .await?
            }
            ToolCall::AgentSelf => backend.agent_self().await?,
            ToolCall::CatalogDatacenters => Value::from(backend.catalog_datacenters().await?),
            ToolCall::CatalogNodes(args) => backend.catalog_nodes(&args.options.query()).await?,
            ToolCall::CatalogNodeServices(args) => {
                backend
                    .catalog_node_services(&args.node, &args.options.query())
                    .await?
            }
            ToolCall::CatalogServices(args) => {
                backend.catalog_services(&args.options.query()).await?
            }
            ToolCall::CatalogServiceNodes(args) => {
                backend
                    .catalog_service_nodes(
                        &args.service,
                        args.tag.as_deref(),
                        &args.options.query(),
                    )
                    .await?
            }
            ToolCall::HealthNode(args) => {
                backend
                    .health_node(&args.node, &args.options.query())
                    .await?
            }
            ToolCall::HealthChecks(args) => {
                backend
                    .health_checks(&args.service, &args.options.query())
                    .await?
            }
            ToolCall::HealthService(args) => {
                backend
                    .health_service(&args.service, &args.filter, &args.options.query())
                    .await?
            }
            ToolCall::HealthState(args) => {
                backend
                    .health_state(args.state, &args.options.query())
                    .await?
            }
        })
    }
}

/// Render a backend result as indented JSON. `null` renders as the literal `null`.
pub fn render(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

async fn run(
    backend: &dyn ConsulBackend,
    name: &str,
    arguments: Option<&ArgumentMap>,
) -> Result<String, ToolError> {
    let call = ToolCall::parse(name, arguments)?;
    debug!(target: "consul_mcp::tools", ?call, "Dispatching tool call");
    let value = call.execute(backend).await?;
    Ok(render(&value)?)
}

/// Handle one `tools/call` request. Failures never escape as protocol errors; they
/// come back as a single `Error: <message>` segment with `isError` set.
pub async fn call_tool(
    backend: &dyn ConsulBackend,
    name: &str,
    arguments: Option<&ArgumentMap>,
) -> CallToolResult {
    let span = ToolCallSpan::start(name);
    let outcome = run(backend, name, arguments)
        .instrument(span.span().clone())
        .await;

    match outcome {
        Ok(text) => {
            span.finish(CallStatus::Ok);
            CallToolResult::success(vec![Content::text(text)])
        }
        Err(err) => {
            warn!(
                target: "consul_mcp::tools",
                call_id = %span.call_id(),
                tool = name,
                error = %err,
                "Tool call failed"
            );
            span.finish(CallStatus::Error);
            CallToolResult::error(vec![Content::text(format!("Error: {err}"))])
        }
    }
}
