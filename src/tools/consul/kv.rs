//! Key/value store tools: `kv_get`, `kv_keys`, `kv_set`.
use schemars::JsonSchema;
use serde::Deserialize;

use super::{
    args::{ArgumentError, ToolArguments},
    common::{ReadOptions, ScopeOptions},
};
use crate::lib::consul::{KvGetOptions, KvWriteOptions};

/// Input for `kv_get`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct KvGetArgs {
    /// Key to retrieve
    pub key: String,
    #[serde(flatten)]
    pub kv: KvGetOptions,
    #[serde(flatten)]
    pub options: ReadOptions,
}

impl ToolArguments for KvGetArgs {
    fn validate(&self) -> Result<(), ArgumentError> {
        self.options.validate()
    }
}

/// Input for `kv_keys`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct KvKeysArgs {
    /// Key prefix
    #[serde(rename = "key")]
    pub prefix: String,
    /// List keys up to separator
    pub separator: Option<String>,
    #[serde(flatten)]
    pub options: ReadOptions,
}

impl ToolArguments for KvKeysArgs {
    fn validate(&self) -> Result<(), ArgumentError> {
        self.options.validate()
    }
}

/// Input for `kv_set`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct KvSetArgs {
    /// Key to write
    pub key: String,
    /// Value to store
    pub value: String,
    #[serde(flatten)]
    pub write: KvWriteOptions,
    #[serde(flatten)]
    pub options: ScopeOptions,
}

impl ToolArguments for KvSetArgs {}
