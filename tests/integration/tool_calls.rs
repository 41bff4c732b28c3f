use consul_mcp::tools::consul::{call_tool, ArgumentMap, ToolKind};
use serde_json::{json, Value};

use crate::common::{is_error, result_text, InMemoryConsul};

fn args(value: Value) -> ArgumentMap {
    value.as_object().cloned().expect("object literal")
}

fn minimal_arguments(kind: ToolKind) -> ArgumentMap {
    match kind {
        ToolKind::KvGet | ToolKind::KvKeys => args(json!({ "key": "test/key" })),
        ToolKind::KvSet => args(json!({ "key": "test/key", "value": "v" })),
        ToolKind::CatalogNodeServices | ToolKind::HealthNode => {
            args(json!({ "node": "test-node" }))
        }
        ToolKind::CatalogServiceNodes | ToolKind::HealthChecks | ToolKind::HealthService => {
            args(json!({ "service": "test-service" }))
        }
        ToolKind::HealthState => args(json!({ "state": "passing" })),
        ToolKind::StatusLeader
        | ToolKind::StatusPeers
        | ToolKind::AgentMembers
        | ToolKind::AgentSelf
        | ToolKind::CatalogDatacenters
        | ToolKind::CatalogNodes
        | ToolKind::CatalogServices => ArgumentMap::new(),
    }
}

#[tokio::test]
async fn every_tool_succeeds_with_minimal_arguments() {
    let backend = InMemoryConsul::with_keys(&[("test/key", "test-value")]);
    for kind in ToolKind::ALL {
        let arguments = minimal_arguments(kind);
        let result = call_tool(&backend, kind.name(), Some(&arguments)).await;
        assert!(
            !is_error(&result),
            "{} failed: {}",
            kind.name(),
            result_text(&result)
        );
        assert!(!result.content.is_empty(), "{} returned no content", kind.name());
    }
}

#[tokio::test]
async fn results_carry_backend_data() {
    let backend = InMemoryConsul::with_keys(&[("test/key", "test-value")]);
    let cases = [
        ("kv_get", json!({ "key": "test/key" }), "test-value"),
        ("status_leader", json!({}), "127.0.0.1:8300"),
        ("status_peers", json!({}), "127.0.0.1:8301"),
        ("agent_members", json!({}), "test-node"),
        ("agent_self", json!({}), "test-node"),
        ("catalog_datacenters", json!({}), "dc1"),
        ("catalog_services", json!({}), "test-service"),
        ("catalog_node_services", json!({ "node": "test-node" }), "test-node"),
        ("health_checks", json!({ "service": "test-service" }), "test-service"),
        ("health_state", json!({ "state": "critical" }), "critical"),
    ];
    for (name, arguments, needle) in cases {
        let result = call_tool(&backend, name, Some(&args(arguments))).await;
        let text = result_text(&result);
        assert!(!is_error(&result), "{name} failed: {text}");
        assert!(text.contains(needle), "{name} output should contain {needle}: {text}");
    }
}

#[tokio::test]
async fn unknown_tool_is_reported_in_result() {
    let backend = InMemoryConsul::new();
    let result = call_tool(&backend, "unknown_tool", None).await;
    assert!(is_error(&result));
    assert_eq!(result_text(&result), "Error: Unknown tool: unknown_tool");
}

#[tokio::test]
async fn kv_get_without_key_is_an_error() {
    let backend = InMemoryConsul::new();
    let result = call_tool(&backend, "kv_get", Some(&ArgumentMap::new())).await;
    assert!(is_error(&result));
    assert_eq!(
        result_text(&result),
        "Error: Invalid arguments for `kv_get`: missing field `key`"
    );
}

#[tokio::test]
async fn null_and_mistyped_arguments_are_errors() {
    let backend = InMemoryConsul::new();
    let null_node = call_tool(
        &backend,
        "health_node",
        Some(&args(json!({ "node": null, "dc": null }))),
    )
    .await;
    assert!(is_error(&null_node));
    assert!(result_text(&null_node).ends_with("missing field `node`"));

    let numeric_key = call_tool(&backend, "kv_get", Some(&args(json!({ "key": 5 })))).await;
    assert!(is_error(&numeric_key));
    assert!(
        result_text(&numeric_key).contains("invalid type: integer `5`"),
        "{}",
        result_text(&numeric_key)
    );
}

#[tokio::test]
async fn invalid_health_state_is_an_error() {
    let backend = InMemoryConsul::new();
    let result = call_tool(
        &backend,
        "health_state",
        Some(&args(json!({ "state": "invalid" }))),
    )
    .await;
    assert!(is_error(&result));
    assert!(result_text(&result).starts_with("Error: "));
}

#[tokio::test]
async fn kv_set_then_get_returns_value() {
    let backend = InMemoryConsul::new();
    let set = call_tool(
        &backend,
        "kv_set",
        Some(&args(json!({ "key": "test/sample-key", "value": "sample-value" }))),
    )
    .await;
    assert_eq!(result_text(&set), "true");

    let get = call_tool(
        &backend,
        "kv_get",
        Some(&args(json!({ "key": "test/sample-key", "raw": true }))),
    )
    .await;
    assert!(!is_error(&get));
    assert_eq!(result_text(&get), "\"sample-value\"");
}

#[tokio::test]
async fn kv_keys_lists_written_keys_under_prefix() {
    let backend = InMemoryConsul::with_keys(&[
        ("test/sample-key", "sample-value"),
        ("test/another-key", "another-value"),
        ("test/nested/deep-key", "deep-value"),
        ("other/key", "x"),
    ]);

    let result = call_tool(&backend, "kv_keys", Some(&args(json!({ "key": "test/" })))).await;
    let keys: Vec<String> = serde_json::from_str(&result_text(&result)).expect("JSON list");
    assert_eq!(
        keys,
        ["test/another-key", "test/nested/deep-key", "test/sample-key"]
    );

    let folded = call_tool(
        &backend,
        "kv_keys",
        Some(&args(json!({ "key": "test/", "separator": "/" }))),
    )
    .await;
    let keys: Vec<String> = serde_json::from_str(&result_text(&folded)).expect("JSON list");
    assert_eq!(keys, ["test/another-key", "test/nested/", "test/sample-key"]);
}

#[tokio::test]
async fn missing_key_renders_null() {
    let backend = InMemoryConsul::new();
    let result = call_tool(&backend, "kv_get", Some(&args(json!({ "key": "absent" })))).await;
    assert!(!is_error(&result));
    assert_eq!(result_text(&result), "null");
}

#[tokio::test]
async fn consistent_and_stale_together_are_rejected() {
    let backend = InMemoryConsul::with_keys(&[("k", "v")]);
    let result = call_tool(
        &backend,
        "kv_get",
        Some(&args(json!({ "key": "k", "consistent": true, "stale": true }))),
    )
    .await;
    assert!(is_error(&result));
}

#[tokio::test]
async fn backend_failure_becomes_error_result() {
    let backend = InMemoryConsul::failing("connection refused");
    let result = call_tool(&backend, "status_leader", None).await;
    assert!(is_error(&result));
    let text = result_text(&result);
    assert!(text.starts_with("Error: "), "{text}");
    assert!(text.contains("connection refused"), "{text}");
}
