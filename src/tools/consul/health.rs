//! Health tools: node checks, service checks, service health, and checks by state.
use schemars::JsonSchema;
use serde::Deserialize;

use super::{args::ToolArguments, common::ScopeOptions};
use crate::lib::consul::{HealthState, ServiceHealthFilter};

/// Input for `health_checks`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct ServiceArgs {
    /// Service name
    pub service: String,
    #[serde(flatten)]
    pub options: ScopeOptions,
}

impl ToolArguments for ServiceArgs {}

/// Input for `health_service`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct HealthServiceArgs {
    /// Service name
    pub service: String,
    #[serde(flatten)]
    pub filter: ServiceHealthFilter,
    #[serde(flatten)]
    pub options: ScopeOptions,
}

impl ToolArguments for HealthServiceArgs {}

/// Input for `health_state`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct HealthStateArgs {
    pub state: HealthState,
    #[serde(flatten)]
    pub options: ScopeOptions,
}

impl ToolArguments for HealthStateArgs {}
