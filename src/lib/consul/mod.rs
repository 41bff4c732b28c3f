//! Consul HTTP API collaborator: request option types, the backend trait, and the
//! `reqwest` implementation used at runtime.

mod client;
mod kv;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::lib::errors::ConsulError;

pub use client::ConsulClient;
pub use kv::decode_kv_entries;

/// Read consistency requested from the Consul servers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Consistency {
    /// Leader-forwarded read without a quorum check.
    #[default]
    Default,
    /// `?consistent`: the leader verifies it is still leader before answering.
    Consistent,
    /// `?stale`: any server may answer, possibly with stale data.
    Stale,
}

impl Consistency {
    pub const fn query_flag(&self) -> Option<&'static str> {
        match self {
            Consistency::Default => None,
            Consistency::Consistent => Some("consistent"),
            Consistency::Stale => Some("stale"),
        }
    }
}

/// Options shared by nearly every Consul request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub datacenter: Option<String>,
    /// Overrides the client's default ACL token for this request.
    pub token: Option<String>,
    pub consistency: Consistency,
}

/// Flags controlling how key/value entries are fetched and decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(default)]
pub struct KvGetOptions {
    /// Return all keys with given prefix
    pub recurse: bool,
    /// Return raw value
    pub raw: bool,
    /// Decode value into Buffer
    pub buffer: bool,
}

/// Optional write parameters for `PUT /v1/kv/{key}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct KvWriteOptions {
    /// Opaque unsigned integer stored with the key
    pub flags: Option<u64>,
    /// Check-and-set: only write if the key's ModifyIndex matches
    pub cas: Option<u64>,
    /// Session ID to lock with
    pub acquire: Option<String>,
    /// Session ID to unlock with
    pub release: Option<String>,
}

/// Filters for `GET /v1/health/service/{service}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ServiceHealthFilter {
    /// Filter by tag
    pub tag: Option<String>,
    /// Only passing checks
    pub passing: bool,
}

/// Health check state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[schemars(inline)]
pub enum HealthState {
    Any,
    Passing,
    Warning,
    Critical,
}

impl HealthState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            HealthState::Any => "any",
            HealthState::Passing => "passing",
            HealthState::Warning => "warning",
            HealthState::Critical => "critical",
        }
    }
}

/// Operations this server needs from a Consul agent.
///
/// Record-shaped responses are passed through as JSON so that every field the
/// agent reports reaches the caller unchanged.
#[async_trait]
pub trait ConsulBackend: Send + Sync {
    /// Fetch a key (or a prefix with `recurse`). Absent keys yield `Value::Null`.
    async fn kv_get(
        &self,
        key: &str,
        kv: KvGetOptions,
        options: &QueryOptions,
    ) -> Result<Value, ConsulError>;

    /// List full key paths under `prefix`, optionally folded at `separator`.
    async fn kv_keys(
        &self,
        prefix: &str,
        separator: Option<&str>,
        options: &QueryOptions,
    ) -> Result<Vec<String>, ConsulError>;

    async fn kv_set(
        &self,
        key: &str,
        value: &str,
        write: &KvWriteOptions,
        options: &QueryOptions,
    ) -> Result<bool, ConsulError>;

    async fn status_leader(&self) -> Result<String, ConsulError>;

    async fn status_peers(&self) -> Result<Vec<String>, ConsulError>;

    async fn agent_members(&self, wan: bool, options: &QueryOptions)
        -> Result<Value, ConsulError>;

    async fn agent_self(&self) -> Result<Value, ConsulError>;

    async fn catalog_datacenters(&self) -> Result<Vec<String>, ConsulError>;

    async fn catalog_nodes(&self, options: &QueryOptions) -> Result<Value, ConsulError>;

    async fn catalog_node_services(
        &self,
        node: &str,
        options: &QueryOptions,
    ) -> Result<Value, ConsulError>;

    /// Map of service name to its tags.
    async fn catalog_services(&self, options: &QueryOptions) -> Result<Value, ConsulError>;

    async fn catalog_service_nodes(
        &self,
        service: &str,
        tag: Option<&str>,
        options: &QueryOptions,
    ) -> Result<Value, ConsulError>;

    async fn health_node(&self, name: &str, options: &QueryOptions)
        -> Result<Value, ConsulError>;

    async fn health_checks(
        &self,
        service: &str,
        options: &QueryOptions,
    ) -> Result<Value, ConsulError>;

    async fn health_service(
        &self,
        service: &str,
        filter: &ServiceHealthFilter,
        options: &QueryOptions,
    ) -> Result<Value, ConsulError>;

    async fn health_state(
        &self,
        state: HealthState,
        options: &QueryOptions,
    ) -> Result<Value, ConsulError>;
}
