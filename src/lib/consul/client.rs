use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{
    decode_kv_entries, ConsulBackend, HealthState, KvGetOptions, KvWriteOptions, QueryOptions,
    ServiceHealthFilter,
};
use crate::{lib::errors::ConsulError, server::config::ConsulSection};

const TOKEN_HEADER: &str = "X-Consul-Token";

/// `reqwest`-backed client for the subset of the Consul HTTP API exposed as tools.
#[derive(Debug, Clone)]
pub struct ConsulClient {
    http: reqwest::Client,
    base_url: String,
    default_token: Option<String>,
}

impl ConsulClient {
    pub fn new(settings: &ConsulSection) -> Result<Self, ConsulError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("consul-mcp/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|source| ConsulError::ClientBuild { source })?;
        Ok(Self {
            http,
            base_url: settings.base_url(),
            default_token: settings.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        query: Query,
        token: Option<&str>,
    ) -> RequestBuilder {
        let url = format!("{}/v1/{}", self.base_url, path);
        let mut request = self.http.request(method, url).query(&query.pairs);
        if let Some(token) = token.or(self.default_token.as_deref()) {
            request = request.header(TOKEN_HEADER, token);
        }
        request
    }

    /// Send a request and log the status; any status is returned as-is.
    async fn dispatch(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<Response, ConsulError> {
        let response = request
            .send()
            .await
            .map_err(|source| ConsulError::Transport { source })?;
        debug!(
            target: "consul_mcp::consul",
            endpoint,
            status = response.status().as_u16(),
            "Consul responded"
        );
        Ok(response)
    }

    /// Send a request; `Ok(None)` when Consul answers 404.
    async fn send_allow_missing(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<Option<Response>, ConsulError> {
        let response = self.dispatch(request, endpoint).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        ensure_success(response).await.map(Some)
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Response, ConsulError> {
        ensure_success(self.dispatch(request, endpoint).await?).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query,
        token: Option<&str>,
    ) -> Result<T, ConsulError> {
        let response = self
            .send(self.request(Method::GET, path, query, token), path)
            .await?;
        read_json(response, path).await
    }
}

#[async_trait]
impl ConsulBackend for ConsulClient {
    async fn kv_get(
        &self,
        key: &str,
        kv: KvGetOptions,
        options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        let path = kv_path(key);
        let query = Query::with_options(options)
            .flag("recurse", kv.recurse)
            .flag("raw", kv.raw);
        let request = self.request(Method::GET, &path, query, options.token.as_deref());
        let Some(response) = self.send_allow_missing(request, &path).await? else {
            return Ok(Value::Null);
        };
        if kv.raw {
            let body = response
                .bytes()
                .await
                .map_err(|source| ConsulError::Transport { source })?;
            return Ok(Value::String(String::from_utf8_lossy(&body).into_owned()));
        }
        let body: Value = read_json(response, &path).await?;
        decode_kv_entries(body, kv.recurse, kv.buffer).map_err(|message| ConsulError::Decode {
            endpoint: path,
            message,
        })
    }

    async fn kv_keys(
        &self,
        prefix: &str,
        separator: Option<&str>,
        options: &QueryOptions,
    ) -> Result<Vec<String>, ConsulError> {
        let path = kv_path(prefix);
        let query = Query::with_options(options)
            .flag("keys", true)
            .value("separator", separator);
        let request = self.request(Method::GET, &path, query, options.token.as_deref());
        match self.send_allow_missing(request, &path).await? {
            Some(response) => read_json(response, &path).await,
            None => Ok(Vec::new()),
        }
    }

    async fn kv_set(
        &self,
        key: &str,
        value: &str,
        write: &KvWriteOptions,
        options: &QueryOptions,
    ) -> Result<bool, ConsulError> {
        let path = kv_path(key);
        let query = Query::with_datacenter(options)
            .value("flags", write.flags)
            .value("cas", write.cas)
            .value("acquire", write.acquire.as_deref())
            .value("release", write.release.as_deref());
        let request = self
            .request(Method::PUT, &path, query, options.token.as_deref())
            .body(value.to_owned());
        let response = self.send(request, &path).await?;
        read_json(response, &path).await
    }

    async fn status_leader(&self) -> Result<String, ConsulError> {
        self.get_json("status/leader", Query::default(), None).await
    }

    async fn status_peers(&self) -> Result<Vec<String>, ConsulError> {
        self.get_json("status/peers", Query::default(), None).await
    }

    async fn agent_members(
        &self,
        wan: bool,
        options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        let query = Query::with_options(options).value("wan", wan.then_some(1));
        self.get_json("agent/members", query, options.token.as_deref())
            .await
    }

    async fn agent_self(&self) -> Result<Value, ConsulError> {
        self.get_json("agent/self", Query::default(), None).await
    }

    async fn catalog_datacenters(&self) -> Result<Vec<String>, ConsulError> {
        self.get_json("catalog/datacenters", Query::default(), None)
            .await
    }

    async fn catalog_nodes(&self, options: &QueryOptions) -> Result<Value, ConsulError> {
        self.get_json(
            "catalog/nodes",
            Query::with_options(options),
            options.token.as_deref(),
        )
        .await
    }

    async fn catalog_node_services(
        &self,
        node: &str,
        options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        let path = format!("catalog/node/{}", urlencoding::encode(node));
        self.get_json(&path, Query::with_options(options), options.token.as_deref())
            .await
    }

    async fn catalog_services(&self, options: &QueryOptions) -> Result<Value, ConsulError> {
        self.get_json(
            "catalog/services",
            Query::with_options(options),
            options.token.as_deref(),
        )
        .await
    }

    async fn catalog_service_nodes(
        &self,
        service: &str,
        tag: Option<&str>,
        options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        let path = format!("catalog/service/{}", urlencoding::encode(service));
        let query = Query::with_options(options).value("tag", tag);
        self.get_json(&path, query, options.token.as_deref()).await
    }

    async fn health_node(
        &self,
        name: &str,
        options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        let path = format!("health/node/{}", urlencoding::encode(name));
        self.get_json(&path, Query::with_options(options), options.token.as_deref())
            .await
    }

    async fn health_checks(
        &self,
        service: &str,
        options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        let path = format!("health/checks/{}", urlencoding::encode(service));
        self.get_json(&path, Query::with_options(options), options.token.as_deref())
            .await
    }

    async fn health_service(
        &self,
        service: &str,
        filter: &ServiceHealthFilter,
        options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        let path = format!("health/service/{}", urlencoding::encode(service));
        let query = Query::with_options(options)
            .value("tag", filter.tag.as_deref())
            .flag("passing", filter.passing);
        self.get_json(&path, query, options.token.as_deref()).await
    }

    async fn health_state(
        &self,
        state: HealthState,
        options: &QueryOptions,
    ) -> Result<Value, ConsulError> {
        let path = format!("health/state/{}", state.as_str());
        self.get_json(&path, Query::with_options(options), options.token.as_deref())
            .await
    }
}

/// Ordered query parameters; flags are sent with an empty value.
#[derive(Debug, Default)]
struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    fn with_datacenter(options: &QueryOptions) -> Self {
        Self::default().value("dc", options.datacenter.as_deref())
    }

    fn with_options(options: &QueryOptions) -> Self {
        let query = Self::with_datacenter(options);
        match options.consistency.query_flag() {
            Some(flag) => query.flag(flag, true),
            None => query,
        }
    }

    fn flag(mut self, name: &'static str, enabled: bool) -> Self {
        if enabled {
            self.pairs.push((name, String::new()));
        }
        self
    }

    fn value<V: ToString>(mut self, name: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.pairs.push((name, value.to_string()));
        }
        self
    }
}

/// Build `kv/<key>` keeping `/` separators and encoding each segment.
fn kv_path(key: &str) -> String {
    let encoded = key
        .trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("kv/{encoded}")
}

async fn read_json<T: DeserializeOwned>(
    response: Response,
    endpoint: &str,
) -> Result<T, ConsulError> {
    let body = response
        .bytes()
        .await
        .map_err(|source| ConsulError::Transport { source })?;
    serde_json::from_slice(&body).map_err(|err| ConsulError::Decode {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    })
}

async fn ensure_success(response: Response) -> Result<Response, ConsulError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = match body.trim() {
        "" => status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string(),
        trimmed => trimmed.to_string(),
    };
    Err(ConsulError::Status {
        status: status.as_u16(),
        message,
    })
}
