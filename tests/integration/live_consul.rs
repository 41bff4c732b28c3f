//! Runs against a real agent at CONSUL_HOST/CONSUL_PORT when CONSUL_MCP_LIVE_TESTS=1.
use std::env;

use anyhow::Result;
use consul_mcp::{
    lib::consul::{ConsulBackend, ConsulClient},
    server::config::ServerConfig,
    tools::consul::{call_tool, ArgumentMap},
};
use serde_json::json;

use crate::common::{is_error, result_text};

fn live_client() -> Option<ConsulClient> {
    if env::var("CONSUL_MCP_LIVE_TESTS").ok().as_deref() != Some("1") {
        eprintln!("Skipping live Consul test; set CONSUL_MCP_LIVE_TESTS=1 to enable");
        return None;
    }
    let config = ServerConfig::load_from_env().expect("CONSUL_* settings should load");
    Some(ConsulClient::new(&config.consul).expect("client builds"))
}

fn args(value: serde_json::Value) -> ArgumentMap {
    value.as_object().cloned().expect("object literal")
}

#[tokio::test]
async fn live_leader_looks_like_an_address() -> Result<()> {
    let Some(client) = live_client() else {
        return Ok(());
    };
    let leader = client.status_leader().await?;
    assert!(leader.contains(':'), "leader should be host:port, got {leader}");
    Ok(())
}

#[tokio::test]
async fn live_kv_round_trip() -> Result<()> {
    let Some(client) = live_client() else {
        return Ok(());
    };

    for (key, value) in [
        ("consul-mcp-test/sample-key", "sample-value"),
        ("consul-mcp-test/nested/deep-key", "deep-value"),
    ] {
        let set = call_tool(
            &client,
            "kv_set",
            Some(&args(json!({ "key": key, "value": value }))),
        )
        .await;
        assert_eq!(result_text(&set), "true");
    }

    let get = call_tool(
        &client,
        "kv_get",
        Some(&args(json!({ "key": "consul-mcp-test/sample-key" }))),
    )
    .await;
    assert!(!is_error(&get), "{}", result_text(&get));
    assert!(result_text(&get).contains("sample-value"));

    let keys = call_tool(
        &client,
        "kv_keys",
        Some(&args(json!({ "key": "consul-mcp-test/" }))),
    )
    .await;
    assert!(result_text(&keys).contains("consul-mcp-test/nested/deep-key"));

    let missing = call_tool(
        &client,
        "kv_get",
        Some(&args(json!({ "key": "consul-mcp-test/does-not-exist" }))),
    )
    .await;
    assert_eq!(result_text(&missing), "null");
    Ok(())
}

#[tokio::test]
async fn live_catalog_lists_a_datacenter() -> Result<()> {
    let Some(client) = live_client() else {
        return Ok(());
    };
    let datacenters = client.catalog_datacenters().await?;
    assert!(!datacenters.is_empty());
    Ok(())
}
