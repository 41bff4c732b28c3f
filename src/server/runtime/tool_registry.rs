use std::sync::Arc;

use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, ErrorData, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    RoleServer,
};

use crate::{
    lib::{
        consul::{ConsulBackend, ConsulClient},
        errors::ConsulError,
    },
    server::config::ServerConfig,
    tools::consul::{self as consul_tools, advertised_tools},
};

/// MCP handler exposing the Consul tools over a shared backend.
#[derive(Clone)]
pub struct ConsulServer {
    backend: Arc<dyn ConsulBackend>,
    instructions: Arc<String>,
}

impl ConsulServer {
    /// Build a server talking to the agent described by `config`.
    pub fn new(config: &ServerConfig, instructions: String) -> Result<Self, ConsulError> {
        let client = ConsulClient::new(&config.consul)?;
        Ok(Self::with_backend(Arc::new(client), instructions))
    }

    /// Build a server over any backend, e.g. an in-memory one in tests.
    pub fn with_backend(backend: Arc<dyn ConsulBackend>, instructions: String) -> Self {
        Self {
            backend,
            instructions: Arc::new(instructions),
        }
    }

    pub fn backend(&self) -> Arc<dyn ConsulBackend> {
        Arc::clone(&self.backend)
    }
}

impl ServerHandler for ConsulServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some((*self.instructions).clone()),
            ..ServerInfo::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        let tools = advertised_tools()
            .iter()
            .map(|descriptor| descriptor.to_tool())
            .collect();
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(consul_tools::call_tool(
            self.backend.as_ref(),
            &request.name,
            request.arguments.as_ref(),
        )
        .await)
    }
}
