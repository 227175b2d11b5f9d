//! Tool system integration tests
//!
//! Exercises registration, schema validation and delegation to the Coles
//! client through the public `ToolSystem` API.

use coles_mcp::api::ApiError;
use coles_mcp::testing::{test_api_config, MockTool, TEST_DATA_PREFIX};
use coles_mcp::tools::{Tool, ToolError, ToolSystem};
use coles_mcp::ColesClient;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn coles_tools(origin: &str) -> ToolSystem {
    let client = ColesClient::new(&test_api_config(origin)).unwrap();
    ToolSystem::with_coles_client(Arc::new(client))
}

#[tokio::test]
async fn test_search_tool_passes_result_through() {
    let mock_server = MockServer::start().await;
    let body = json!({"pageProps": {"searchResults": {"noOfResults": 0, "results": []}}});

    Mock::given(method("GET"))
        .and(path(format!("{TEST_DATA_PREFIX}/search/products.json")))
        .and(query_param("q", "tim tams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = coles_tools(&mock_server.uri())
        .execute_tool("fetch_product_data", &json!({"query": "tim tams"}))
        .await
        .unwrap();

    assert_eq!(result, body);
}

#[tokio::test]
async fn test_details_tool_surfaces_http_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = coles_tools(&mock_server.uri())
        .execute_tool("fetch_product_details", &json!({"product_slug": "x-1"}))
        .await;

    match result {
        Err(ToolError::Api(ApiError::HttpStatus { status, url })) => {
            assert_eq!(status, 404);
            assert!(url.contains("x-1.json"));
        }
        other => panic!("expected HTTP status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_schema_rejects_non_string_query_before_execution() {
    let mock_server = MockServer::start().await;
    let tools = coles_tools(&mock_server.uri());

    let result = tools
        .execute_tool("fetch_product_data", &json!({"query": ["milk"]}))
        .await;

    assert!(matches!(result, Err(ToolError::ValidationError(_))));
}

#[tokio::test]
async fn test_slug_tool_schema_requires_every_field() {
    let mock_server = MockServer::start().await;
    let tools = coles_tools(&mock_server.uri());

    let result = tools
        .execute_tool(
            "create_product_slug",
            &json!({"brand": "ACME", "name": "Milk", "size": "1L"}),
        )
        .await;

    match result {
        Err(ToolError::ValidationError(message)) => assert!(message.contains("product_id")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_mock_tool_receives_arguments_verbatim() {
    let mock = MockTool::new("echo", json!("done"));
    let calls = mock.clone();
    let mut tools = ToolSystem::new();
    tools.register(Box::new(mock));

    let arguments = json!({"a": 1, "b": [true, null]});
    let result = tools.execute_tool("echo", &arguments).await.unwrap();

    assert_eq!(result, json!("done"));
    assert_eq!(calls.get_calls().await, vec![arguments]);
}

#[tokio::test]
async fn test_describe_tool() {
    let mock_server = MockServer::start().await;
    let tools = coles_tools(&mock_server.uri());

    let description = tools.describe_tool("fetch_product_details").unwrap();
    assert!(description.description.contains("nutritional information"));
    assert!(tools.describe_tool("missing").is_none());

    let mock = MockTool::new("echo", json!(null));
    assert_eq!(mock.describe().name, "echo");
}
