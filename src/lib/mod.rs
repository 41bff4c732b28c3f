//! Shared library modules providing error types, the Consul client, and telemetry initialization.

pub mod consul;
pub mod errors;
pub mod telemetry;
