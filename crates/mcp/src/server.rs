// MCP server: JSON-RPC dispatch over a single HTTP endpoint

use crate::catalog::TOOL_LIST_METHOD;
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo,
    ToolContent, ToolsCapability,
};
use crate::tools::{ToolError, ToolRegistry};
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const PROTOCOL_VERSION: &str = "2024-11-05";

/// A JSON-RPC response together with the HTTP status it is sent with
#[derive(Debug, Clone)]
pub struct RpcReply {
    pub status: StatusCode,
    pub response: JsonRpcResponse,
}

impl RpcReply {
    fn ok(id: Value, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(result) => Self {
                status: StatusCode::OK,
                response: JsonRpcResponse::success(id, result),
            },
            Err(e) => Self::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                id,
                JsonRpcError::internal_error(format!("Failed to encode result: {}", e)),
            ),
        }
    }

    fn error(status: StatusCode, id: Value, error: JsonRpcError) -> Self {
        Self {
            status,
            response: JsonRpcResponse::error(id, error),
        }
    }
}

impl IntoResponse for RpcReply {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.response)).into_response()
    }
}

/// Routes JSON-RPC requests to the registered tools
pub struct McpServer {
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Build the HTTP router for this server
    pub fn router(self) -> Router {
        Router::new()
            .route("/mcp", post(handle_mcp))
            .route("/mcp/", post(handle_mcp))
            .route("/health", get(handle_health))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::new(self))
    }

    /// Serve until the process is stopped
    pub async fn start(self, addr: &str) -> Result<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("MCP server listening on {}", addr);

        axum::serve(listener, app).await?;
        Ok(())
    }

    /// Handle a raw request body
    pub async fn handle_body(&self, body: &str) -> RpcReply {
        let value: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Rejected unparseable request: {}", e);
                return RpcReply::error(
                    StatusCode::BAD_REQUEST,
                    Value::Null,
                    JsonRpcError::parse_error(),
                );
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return RpcReply::error(
                    StatusCode::BAD_REQUEST,
                    id,
                    JsonRpcError::invalid_request(format!("Invalid Request: {}", e)),
                );
            }
        };

        self.handle_request(request).await
    }

    /// Dispatch a parsed request by method name
    pub async fn handle_request(&self, request: JsonRpcRequest) -> RpcReply {
        let id = request.id();
        let params = request.params();
        tracing::info!(method = %request.method, "Handling request");

        match request.method.as_str() {
            TOOL_LIST_METHOD => RpcReply::ok(id, self.registry.list_schemas()),
            "initialize" => self.initialize(id, params),
            "tools/list" => RpcReply::ok(
                id,
                ListToolsResult {
                    tools: self
                        .registry
                        .list_schemas()
                        .into_iter()
                        .map(Into::into)
                        .collect(),
                },
            ),
            "tools/call" => self.call_tool(id, params).await,
            method => match self.registry.get(method) {
                Some(tool) => match tool.execute(params).await {
                    Ok(result) => RpcReply::ok(id, result),
                    Err(err) => {
                        tracing::warn!(method, "Tool call failed: {}", err);
                        let status = match err {
                            ToolError::InvalidParams(_) => StatusCode::BAD_REQUEST,
                            ToolError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
                        };
                        RpcReply::error(status, id, err.into())
                    }
                },
                None => {
                    tracing::warn!(method, "Unknown method");
                    RpcReply::error(
                        StatusCode::NOT_FOUND,
                        id,
                        JsonRpcError::method_not_found(method),
                    )
                }
            },
        }
    }

    fn initialize(&self, id: Value, params: Value) -> RpcReply {
        if let Ok(init) = serde_json::from_value::<InitializeParams>(params) {
            tracing::info!(
                client = %init.client_info.name,
                version = %init.client_info.version,
                "Client initialized"
            );
        }

        RpcReply::ok(
            id,
            InitializeResult {
                protocol_version: PROTOCOL_VERSION.to_string(),
                capabilities: ServerCapabilities {
                    tools: Some(ToolsCapability {
                        list_changed: false,
                    }),
                },
                server_info: ServerInfo {
                    name: "roster-mcp".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
            },
        )
    }

    async fn call_tool(&self, id: Value, params: Value) -> RpcReply {
        let call: CallToolParams = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(e) => {
                return RpcReply::error(
                    StatusCode::BAD_REQUEST,
                    id,
                    JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)),
                );
            }
        };

        let Some(tool) = self.registry.get(&call.name) else {
            return RpcReply::error(
                StatusCode::BAD_REQUEST,
                id,
                JsonRpcError::invalid_params(format!("Unknown tool: {}", call.name)),
            );
        };

        let arguments = match call.arguments {
            Value::Null => Value::Object(Default::default()),
            arguments => arguments,
        };

        let result = match tool.execute(arguments).await {
            Ok(value) => CallToolResult {
                content: vec![ToolContent::text(value.to_string())],
                is_error: None,
            },
            Err(err) => CallToolResult {
                content: vec![ToolContent::error(err.to_string())],
                is_error: Some(true),
            },
        };

        RpcReply::ok(id, result)
    }
}

async fn handle_mcp(State(server): State<Arc<McpServer>>, body: String) -> RpcReply {
    server.handle_body(&body).await
}

async fn handle_health(State(server): State<Arc<McpServer>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "roster-mcp",
        "tools": server.registry.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::protocol::error_codes;
    use crate::tools::employee_registry;
    use axum::body::Body;
    use axum::http::Request;
    use roster_sdk::RosterClient;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn server_for(upstream: &str) -> McpServer {
        let client = RosterClient::builder().base_url(upstream).build().unwrap();
        McpServer::new(employee_registry(client))
    }

    fn ada() -> Value {
        json!({"id": 1, "name": "Ada Lovelace", "email": "ada@example.com", "position": "Engineer"})
    }

    #[tokio::test]
    async fn test_tool_list_is_static() {
        // Nothing listens here; listing must not touch the REST API
        let server = server_for("http://127.0.0.1:9");

        let reply = server
            .handle_body(r#"{"jsonrpc":"2.0","method":"mcp/tool/list","params":{},"id":"abc"}"#)
            .await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.response.id, json!("abc"));

        let expected = serde_json::to_value(catalog::employee_tools()).unwrap();
        assert_eq!(reply.response.result, Some(expected));
        assert_eq!(
            reply.response.result.as_ref().unwrap().as_array().unwrap().len(),
            3
        );
    }

    #[tokio::test]
    async fn test_unknown_method_echoes_id() {
        let server = server_for("http://127.0.0.1:9");

        let reply = server
            .handle_body(r#"{"jsonrpc":"2.0","method":"delete_employee","params":{},"id":42}"#)
            .await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.response.id, json!(42));
        let error = reply.response.error.unwrap();
        assert_eq!(error.code, error_codes::METHOD_NOT_FOUND);
        assert_eq!(error.message, "Method not found: delete_employee");
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = server_for("http://127.0.0.1:9");

        let reply = server.handle_body("{not json").await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.response.id, Value::Null);
        assert_eq!(reply.response.error.unwrap().code, error_codes::PARSE_ERROR);

        let reply = server.handle_body(r#"{"params":{},"id":3}"#).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.response.id, json!(3));
        assert_eq!(reply.response.error.unwrap().code, error_codes::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_get_employee_details_forwards() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/employees/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ada()))
            .mount(&upstream)
            .await;

        let server = server_for(&upstream.uri());
        let reply = server
            .handle_body(
                r#"{"jsonrpc":"2.0","method":"get_employee_details","params":{"employee_id":1},"id":1234}"#,
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.response.result, Some(ada()));
        assert_eq!(reply.response.id, json!(1234));
    }

    #[tokio::test]
    async fn test_upstream_error_is_wrapped() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/employees/9"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"error": "Employee with ID 9 not found."})),
            )
            .mount(&upstream)
            .await;

        let server = server_for(&upstream.uri());
        let reply = server
            .handle_body(
                r#"{"jsonrpc":"2.0","method":"get_employee_details","params":{"employee_id":9},"id":"req-9"}"#,
            )
            .await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.response.id, json!("req-9"));
        let error = reply.response.error.unwrap();
        assert_eq!(error.code, error_codes::UPSTREAM_ERROR);
        assert!(error.message.starts_with("Backend API Error: 404 - "));
        assert!(error.message.contains("Employee with ID 9 not found."));
    }

    #[tokio::test]
    async fn test_missing_employee_id_is_invalid_params() {
        let server = server_for("http://127.0.0.1:9");

        let reply = server
            .handle_body(r#"{"jsonrpc":"2.0","method":"get_employee_details","id":5}"#)
            .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.response.error.unwrap().code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_tools_call_wraps_result_as_text() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/employees/"))
            .and(query_param("position", "eng"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([ada()])))
            .mount(&upstream)
            .await;

        let server = server_for(&upstream.uri());
        let reply = server
            .handle_request(JsonRpcRequest::new(
                1,
                "tools/call",
                json!({"name": "list_employees", "arguments": {"position": "eng"}}),
            ))
            .await;
        assert_eq!(reply.status, StatusCode::OK);

        let result: CallToolResult =
            serde_json::from_value(reply.response.result.unwrap()).unwrap();
        assert!(result.is_error.is_none());
        let ToolContent::Text { text } = &result.content[0];
        let listed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(listed, json!([ada()]));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_wrapped() {
        let server = server_for("http://127.0.0.1:9");

        let reply = server
            .handle_body(
                r#"{"jsonrpc":"2.0","method":"list_employees","params":{"name":""},"id":"t1"}"#,
            )
            .await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.response.id, json!("t1"));
        let error = reply.response.error.unwrap();
        assert_eq!(error.code, error_codes::UPSTREAM_ERROR);
        assert!(error.message.starts_with("Backend API Error: "));
        assert!(reply.response.result.is_none());
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = server_for("http://127.0.0.1:9");

        let reply = server
            .handle_request(JsonRpcRequest::new(
                0,
                "initialize",
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "clientInfo": {"name": "roster-agent", "version": "0.1.0"}
                }),
            ))
            .await;
        assert_eq!(reply.status, StatusCode::OK);

        let result = reply.response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "roster-mcp");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_tools_call_reports_upstream_failure() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/employees/9"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"error": "Employee with ID 9 not found."})),
            )
            .mount(&upstream)
            .await;

        let server = server_for(&upstream.uri());
        let reply = server
            .handle_request(JsonRpcRequest::new(
                3,
                "tools/call",
                json!({"name": "get_employee_details", "arguments": {"employee_id": 9}}),
            ))
            .await;
        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.response.error.is_none());

        let result: CallToolResult =
            serde_json::from_value(reply.response.result.unwrap()).unwrap();
        assert_eq!(result.is_error, Some(true));
        let ToolContent::Text { text } = &result.content[0];
        assert!(text.starts_with("Error: Backend API Error: 404"));
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let server = server_for("http://127.0.0.1:9");

        let reply = server
            .handle_request(JsonRpcRequest::new(
                4,
                "tools/call",
                json!({"name": "delete_employee", "arguments": {}}),
            ))
            .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.response.id, json!(4));
        let error = reply.response.error.unwrap();
        assert_eq!(error.code, error_codes::INVALID_PARAMS);
        assert_eq!(error.message, "Unknown tool: delete_employee");
    }

    #[tokio::test]
    async fn test_standard_tools_list_uses_input_schema() {
        let server = server_for("http://127.0.0.1:9");

        let reply = server
            .handle_request(JsonRpcRequest::new(2, "tools/list", json!({})))
            .await;
        let result = reply.response.result.unwrap();
        assert_eq!(result["tools"].as_array().unwrap().len(), 3);
        assert_eq!(
            result["tools"][0]["inputSchema"],
            catalog::create_employee_record().parameters
        );
    }

    #[tokio::test]
    async fn test_http_endpoint() {
        let app = server_for("http://127.0.0.1:9").router();

        let request = Request::builder()
            .method("POST")
            .uri("/mcp/")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"jsonrpc":"2.0","method":"mcp/tool/list","params":{},"id":1}"#,
            ))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let health = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(health).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["tools"], 3);
    }
}
