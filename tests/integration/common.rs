#![allow(dead_code)]

use std::{
    collections::BTreeMap, io, net::TcpListener as StdTcpListener, process::Stdio, sync::Mutex,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use consul_mcp::lib::{
    consul::{
        ConsulBackend, HealthState, KvGetOptions, KvWriteOptions, QueryOptions,
        ServiceHealthFilter,
    },
    errors::ConsulError,
};
use rmcp::model::CallToolResult;
use serde_json::{json, Value};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, ReadBuf},
    process::{Child, ChildStdin, ChildStdout, Command},
    task::JoinHandle,
};

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_consul-mcp");

/// In-memory Consul agent with a writable KV store and canned cluster data.
#[derive(Default)]
pub struct InMemoryConsul {
    kv: Mutex<BTreeMap<String, String>>,
    failure: Option<String>,
}

impl InMemoryConsul {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(entries: &[(&str, &str)]) -> Self {
        let backend = Self::new();
        {
            let mut kv = backend.kv.lock().expect("kv lock");
            for (key, value) in entries {
                kv.insert(key.to_string(), value.to_string());
            }
        }
        backend
    }

    /// Every operation fails with a 500 status error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            kv: Mutex::default(),
            failure: Some(message.to_string()),
        }
    }

    fn check(&self) -> Result<(), ConsulError> {
        match &self.failure {
            Some(message) => Err(ConsulError::Status {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn entry(key: &str, value: &str) -> Value {
        json!({ "Key": key, "Value": value, "Flags": 0 })
    }
}

#[async_trait]
impl ConsulBackend for InMemoryConsul {
    async fn kv_get(
        &self,
        key: &str,
        kv: KvGetOptions,
        _options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        self.check()?;
        let store = self.kv.lock().expect("kv lock");
        if kv.recurse {
            let entries = store
                .iter()
                .filter(|(candidate, _)| candidate.starts_with(key))
                .map(|(candidate, value)| Self::entry(candidate, value))
                .collect::<Vec<_>>();
            return Ok(if entries.is_empty() {
                Value::Null
            } else {
                Value::Array(entries)
            });
        }
        Ok(match store.get(key) {
            None => Value::Null,
            Some(value) if kv.raw => Value::String(value.clone()),
            Some(value) => Self::entry(key, value),
        })
    }

    async fn kv_keys(
        &self,
        prefix: &str,
        separator: Option<&str>,
        _options: &QueryOptions,
    ) -> Result<Vec<String>, ConsulError> {
        self.check()?;
        let store = self.kv.lock().expect("kv lock");
        let mut keys = Vec::<String>::new();
        for key in store.keys().filter(|key| key.starts_with(prefix)) {
            let folded = match separator.and_then(|sep| {
                key[prefix.len()..]
                    .find(sep)
                    .map(|index| prefix.len() + index + sep.len())
            }) {
                Some(end) => key[..end].to_string(),
                None => key.clone(),
            };
            if keys.last() != Some(&folded) {
                keys.push(folded);
            }
        }
        Ok(keys)
    }

    async fn kv_set(
        &self,
        key: &str,
        value: &str,
        _write: &KvWriteOptions,
        _options: &QueryOptions,
    ) -> Result<bool, ConsulError> {
        self.check()?;
        self.kv
            .lock()
            .expect("kv lock")
            .insert(key.to_string(), value.to_string());
        Ok(true)
    }

    async fn status_leader(&self) -> Result<String, ConsulError> {
        self.check()?;
        Ok("127.0.0.1:8300".into())
    }

    async fn status_peers(&self) -> Result<Vec<String>, ConsulError> {
        self.check()?;
        Ok(vec!["127.0.0.1:8300".into(), "127.0.0.1:8301".into()])
    }

    async fn agent_members(
        &self,
        wan: bool,
        _options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        self.check()?;
        let name = if wan { "test-node.dc1" } else { "test-node" };
        Ok(json!([{ "Name": name, "Addr": "127.0.0.1", "Status": 1 }]))
    }

    async fn agent_self(&self) -> Result<Value, ConsulError> {
        self.check()?;
        Ok(json!({ "Config": { "NodeName": "test-node", "Datacenter": "dc1" } }))
    }

    async fn catalog_datacenters(&self) -> Result<Vec<String>, ConsulError> {
        self.check()?;
        Ok(vec!["dc1".into()])
    }

    async fn catalog_nodes(&self, _options: &QueryOptions) -> Result<Value, ConsulError> {
        self.check()?;
        Ok(json!([{ "Node": "test-node", "Address": "127.0.0.1" }]))
    }

    async fn catalog_node_services(
        &self,
        node: &str,
        _options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        self.check()?;
        Ok(json!({ "Node": { "Node": node }, "Services": {} }))
    }

    async fn catalog_services(&self, _options: &QueryOptions) -> Result<Value, ConsulError> {
        self.check()?;
        Ok(json!({ "test-service": ["tag1"] }))
    }

    async fn catalog_service_nodes(
        &self,
        service: &str,
        tag: Option<&str>,
        _options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        self.check()?;
        Ok(json!([{
            "Node": "test-node",
            "ServiceName": service,
            "ServiceTags": tag.into_iter().collect::<Vec<_>>()
        }]))
    }

    async fn health_node(
        &self,
        name: &str,
        _options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        self.check()?;
        Ok(json!([{ "Node": name, "Status": "passing" }]))
    }

    async fn health_checks(
        &self,
        service: &str,
        _options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        self.check()?;
        Ok(json!([{ "ServiceName": service, "Status": "passing" }]))
    }

    async fn health_service(
        &self,
        service: &str,
        _filter: &ServiceHealthFilter,
        _options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        self.check()?;
        Ok(json!([{ "Node": { "Node": "test-node" }, "Service": { "Service": service } }]))
    }

    async fn health_state(
        &self,
        state: HealthState,
        _options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        self.check()?;
        Ok(json!([{ "Status": state.as_str() }]))
    }
}

/// Text of the single content segment of a call result.
pub fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|content| content.as_text())
        .map(|text| text.text.clone())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error.unwrap_or(false)
}

/// A loopback port with nothing listening on it.
pub fn unused_port() -> Result<u16> {
    let listener = StdTcpListener::bind("127.0.0.1:0").context("failed to bind a loopback port")?;
    Ok(listener.local_addr()?.port())
}

/// Spawn the server binary against `consul_port` with a clean `CONSUL_*` environment.
pub async fn spawn_server_process(
    consul_port: u16,
) -> Result<(Child, ChildIoBridge, Option<JoinHandle<()>>)> {
    let mut command = Command::new(BINARY_PATH);
    command
        .env_remove("CONSUL_TOKEN")
        .env_remove("CONSUL_SECURE")
        .env_remove("CONSUL_TIMEOUT_SECS")
        .env("CONSUL_HOST", "127.0.0.1")
        .env("CONSUL_PORT", consul_port.to_string())
        .stdout(Stdio::piped())
        .stdin(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command.spawn().context("failed to spawn server process")?;
    let stdout = child.stdout.take().context("child stdout")?;
    let stdin = child.stdin.take().context("child stdin")?;
    let bridge = ChildIoBridge::new(stdout, stdin);
    let stderr_handle = child.stderr.take().map(|mut stderr| {
        tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf).await;
        })
    });
    Ok((child, bridge, stderr_handle))
}

pub struct ChildIoBridge {
    stdout: ChildStdout,
    stdin: ChildStdin,
}

impl ChildIoBridge {
    pub fn new(stdout: ChildStdout, stdin: ChildStdin) -> Self {
        Self { stdout, stdin }
    }
}

impl AsyncRead for ChildIoBridge {
    fn poll_read(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdout).poll_read(cx, buf)
    }
}

impl AsyncWrite for ChildIoBridge {
    fn poll_write(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        data: &[u8],
    ) -> std::task::Poll<io::Result<usize>> {
        std::pin::Pin::new(&mut self.stdin).poll_write(cx, data)
    }

    fn poll_flush(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdin).poll_flush(cx)
    }

    fn poll_shutdown(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdin).poll_shutdown(cx)
    }
}
