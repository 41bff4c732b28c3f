//! Consul tools: argument shapes, the static registry, and the dispatcher.

pub mod agent;
pub mod args;
pub mod catalog;
pub mod common;
pub mod dispatch;
pub mod health;
pub mod kv;
pub mod registry;

pub use args::{ArgumentError, ArgumentMap};
pub use dispatch::{call_tool, render, ToolCall, ToolError};
pub use registry::{advertised_tools, ToolDescriptor, ToolKind, ToolListing};
