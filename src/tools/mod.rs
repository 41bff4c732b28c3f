//! MCP tools exposed by the server.

pub mod consul;
