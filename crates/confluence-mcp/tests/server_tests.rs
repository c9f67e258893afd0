//! End-to-end MCP flows against a mock Confluence.

use std::sync::Arc;

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use confluence_client::ConfluenceClient;
use confluence_content::ContentManager;
use confluence_mcp::{JsonRpcError, McpServer, StdioTransport, ToolRegistry};

fn server_for(uri: &str) -> McpServer {
    let client = ConfluenceClient::builder()
        .base_url(uri)
        .token("test-token")
        .build()
        .unwrap();
    let manager = ContentManager::new(Arc::new(client));
    McpServer::new(ToolRegistry::with_content_tools(manager))
}

/// A server whose backend is never reached.
fn offline_server() -> McpServer {
    server_for("http://127.0.0.1:9")
}

async fn request(server: &McpServer, message: Value) -> Value {
    let response = server
        .handle_message(&message.to_string())
        .await
        .expect("a reply");
    serde_json::to_value(response).unwrap()
}

#[tokio::test]
async fn test_initialize_echoes_protocol_version() {
    let server = offline_server();
    let reply = request(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "initialize",
            "params": {"protocolVersion": "2025-03-26", "capabilities": {},
                       "clientInfo": {"name": "test", "version": "0"}}
        }),
    )
    .await;

    assert_eq!(reply["id"], 1);
    assert_eq!(reply["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(reply["result"]["serverInfo"]["name"], "Confluence");
    assert!(reply["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_initialized_notification_gets_no_reply() {
    let server = offline_server();
    let reply = server
        .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;
    assert!(reply.is_none());
}

#[tokio::test]
async fn test_tools_list_has_every_tool() {
    let server = offline_server();
    let reply = request(&server, json!({"jsonrpc": "2.0", "id": "a", "method": "tools/list"})).await;

    let names: Vec<&str> = reply["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "create_page",
            "update_page",
            "get_spaces",
            "get_space_count",
            "get_space",
            "get_pages_in_space",
            "get_page_count_for_space",
            "get_page",
            "get_page_by_title",
            "get_child_pages",
            "get_page_ancestors",
            "search_content",
            "get_page_labels",
            "get_content_by_label",
            "get_page_attachments",
        ]
    );
    for tool in reply["result"]["tools"].as_array().unwrap() {
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[tokio::test]
async fn test_parse_error_has_null_id() {
    let server = offline_server();
    let reply = server.handle_message("{not json").await.unwrap();
    assert!(reply.id.is_null());
    assert_eq!(reply.error.unwrap().code, JsonRpcError::PARSE_ERROR);
}

#[tokio::test]
async fn test_unknown_method() {
    let server = offline_server();
    let reply = request(&server, json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"})).await;
    assert_eq!(reply["error"]["code"], JsonRpcError::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_tool_and_bad_arguments() {
    let server = offline_server();
    let reply = request(
        &server,
        json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
               "params": {"name": "delete_space", "arguments": {}}}),
    )
    .await;
    assert_eq!(reply["error"]["code"], JsonRpcError::INVALID_PARAMS);

    let reply = request(
        &server,
        json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call",
               "params": {"name": "get_page", "arguments": {"id": "1"}}}),
    )
    .await;
    assert_eq!(reply["error"]["code"], JsonRpcError::INVALID_PARAMS);
    assert!(reply["error"]["message"].as_str().unwrap().contains("page_id"));
}

#[tokio::test]
async fn test_get_page_tool_returns_marker_for_missing_page() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/content/31"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock)
        .await;

    let server = server_for(&mock.uri());
    let result = server
        .call_tool("get_page", json!({"page_id": "31"}))
        .await
        .unwrap();
    assert!(!result.is_error());
    let value: Value = serde_json::from_str(&result.text()).unwrap();
    assert_eq!(value, json!({"error": "No page found with ID: 31"}));
}

#[tokio::test]
async fn test_content_failure_is_error_result() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/content/8/label"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "statusCode": 403, "message": "Not permitted"
        })))
        .mount(&mock)
        .await;

    let server = server_for(&mock.uri());
    let reply = request(
        &server,
        json!({"jsonrpc": "2.0", "id": 6, "method": "tools/call",
               "params": {"name": "get_page_labels", "arguments": {"page_id": "8"}}}),
    )
    .await;

    assert_eq!(reply["result"]["isError"], true);
    let text = reply["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Error getting labels for page 8: "));
    assert!(text.contains("Not permitted"));
}

#[tokio::test]
async fn test_search_tool_applies_defaults() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/search"))
        .and(query_param("cql", r#"type=page AND text ~ "deploy""#))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"content": {"id": "5", "title": "Deploy", "type": "page",
                                     "_links": {"webui": "/display/OPS/Deploy"}}}]
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let server = server_for(&mock.uri());
    let result = server
        .call_tool("search_content", json!({"query": "deploy"}))
        .await
        .unwrap();
    let value: Value = serde_json::from_str(&result.text()).unwrap();
    assert_eq!(
        value,
        json!([{"id": "5", "title": "Deploy", "type": "page", "url": "/display/OPS/Deploy"}])
    );
}

#[tokio::test]
async fn test_serve_loop_answers_in_request_framing() {
    let server = offline_server();
    let ping = r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#;
    let input = format!(
        "{}\n{}\nContent-Length: {}\r\n\r\n{}",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
        ping.len(),
        ping
    );

    let mut transport = StdioTransport::new(input.as_bytes(), Vec::new());
    server.serve(&mut transport).await.unwrap();
    let (_, written) = transport.into_inner();
    let written = String::from_utf8(written).unwrap();

    let first = r#"{"jsonrpc":"2.0","id":1,"result":{}}"#;
    let second = r#"{"jsonrpc":"2.0","id":2,"result":{}}"#;
    assert_eq!(
        written,
        format!(
            "{}\nContent-Length: {}\r\n\r\n{}",
            first,
            second.len(),
            second
        )
    );
}

#[tokio::test]
async fn test_serve_loop_survives_malformed_input() {
    let server = offline_server();
    let mut input = Vec::new();
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n");
    input.extend_from_slice(b"{\"x\":\"\xff\"}\n");
    input.extend_from_slice(b"Content-Length: 18446744073709551615\r\n\r\n");

    let mut transport = StdioTransport::new(input.as_slice(), Vec::new());
    server.serve(&mut transport).await.unwrap();
    let (_, written) = transport.into_inner();
    let written = String::from_utf8(written).unwrap();

    let (lines, framed) = written.split_once("Content-Length: ").unwrap();
    let replies: Vec<Value> = lines
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(replies[0], json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
    assert_eq!(replies[1]["id"], Value::Null);
    assert_eq!(replies[1]["error"]["code"], JsonRpcError::PARSE_ERROR);

    let (_, body) = framed.split_once("\r\n\r\n").unwrap();
    let oversized: Value = serde_json::from_str(body).unwrap();
    assert_eq!(oversized["error"]["code"], JsonRpcError::PARSE_ERROR);
    assert!(
        oversized["error"]["message"]
            .as_str()
            .unwrap()
            .contains("byte limit")
    );
}

#[tokio::test]
async fn test_serve_loop_answers_after_bad_line() {
    let server = offline_server();
    let mut input = Vec::new();
    input.extend_from_slice(b"{\"x\":\"\xff\"}\n");
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");

    let mut transport = StdioTransport::new(input.as_slice(), Vec::new());
    server.serve(&mut transport).await.unwrap();
    let (_, written) = transport.into_inner();
    let written = String::from_utf8(written).unwrap();
    let replies: Vec<Value> = written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["error"]["code"], JsonRpcError::PARSE_ERROR);
    assert_eq!(replies[1], json!({"jsonrpc": "2.0", "id": 2, "result": {}}));
}
