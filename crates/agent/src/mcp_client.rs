//! JSON-RPC client for the translation server.

use roster_mcp::catalog::TOOL_LIST_METHOD;
use roster_mcp::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolSchema};
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum ToolCallError {
    /// The server answered with a JSON-RPC error envelope
    #[error("{0}")]
    Rpc(JsonRpcError),

    /// Non-success HTTP status without a usable envelope
    #[error("HTTP error calling MCP server ({status}): {body}")]
    Http { status: u16, body: String },

    #[error("Transport error calling MCP server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response from MCP server: {0}")]
    InvalidResponse(String),
}

impl ToolCallError {
    /// Error payload handed to the model in place of a tool result.
    pub fn to_tool_result(&self) -> Value {
        match self {
            Self::Rpc(err) => json!({
                "error": {"code": err.code, "message": err.message}
            }),
            Self::Http { status, body } => json!({
                "error": format!("HTTP error calling MCP server: {}", status),
                "details": body,
            }),
            other => json!({ "error": other.to_string() }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct McpClient {
    http: reqwest::Client,
    endpoint: String,
}

impl McpClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Invoke a tool by name.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, ToolCallError> {
        self.call(name, arguments).await
    }

    /// Fetch the server's tool descriptor.
    pub async fn list_tools(&self) -> Result<Vec<ToolSchema>, ToolCallError> {
        let result = self.call(TOOL_LIST_METHOD, json!({})).await?;
        serde_json::from_value(result).map_err(|e| ToolCallError::InvalidResponse(e.to_string()))
    }

    /// Send one request with a fresh correlation id and return its `result`.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, ToolCallError> {
        let id = uuid::Uuid::new_v4().to_string();
        let request = JsonRpcRequest::new(id.clone(), method, params);
        tracing::info!(method, %id, "Calling MCP server");

        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if let Ok(envelope) = serde_json::from_str::<JsonRpcResponse>(&body) {
            if envelope.id != Value::String(id) {
                tracing::warn!(method, "Response id does not match request id");
            }
            if let Some(error) = envelope.error {
                return Err(ToolCallError::Rpc(error));
            }
            if let (true, Some(result)) = (status.is_success(), envelope.result) {
                return Ok(result);
            }
        }

        if !status.is_success() {
            return Err(ToolCallError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Err(ToolCallError::InvalidResponse(
            "response carries neither result nor error".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_mcp::catalog;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    // Echo the request id back the way the server does
    fn respond_with(payload: Value) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
        move |request: &Request| {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            let mut response = payload.clone();
            response["jsonrpc"] = json!("2.0");
            response["id"] = body["id"].clone();
            ResponseTemplate::new(200).set_body_json(response)
        }
    }

    #[tokio::test]
    async fn test_call_tool_returns_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "jsonrpc": "2.0",
                "method": "get_employee_details",
                "params": {"employee_id": 1}
            })))
            .respond_with(respond_with(json!({"result": {"id": 1, "name": "Ada Lovelace"}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = McpClient::new(format!("{}/mcp/", server.uri()));
        let result = client
            .call_tool("get_employee_details", json!({"employee_id": 1}))
            .await
            .unwrap();
        assert_eq!(result["name"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_request_ids_are_unique() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(respond_with(json!({"result": []})))
            .mount(&server)
            .await;

        let client = McpClient::new(server.uri());
        client.call_tool("list_employees", json!({})).await.unwrap();
        client.call_tool("list_employees", json!({})).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let ids: Vec<Value> = requests
            .iter()
            .map(|r| serde_json::from_slice::<Value>(&r.body).unwrap()["id"].clone())
            .collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(uuid::Uuid::parse_str(ids[0].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_rpc_error_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "jsonrpc": "2.0",
                "error": {"code": -32000, "message": "Backend API Error: 404 - {\"error\":\"Employee with ID 9 not found.\"}"},
                "id": null
            })))
            .mount(&server)
            .await;

        let client = McpClient::new(server.uri());
        let err = client
            .call_tool("get_employee_details", json!({"employee_id": 9}))
            .await
            .unwrap_err();

        let ToolCallError::Rpc(rpc) = &err else {
            panic!("expected rpc error, got {err:?}");
        };
        assert_eq!(rpc.code, -32000);
        assert_eq!(err.to_tool_result()["error"]["code"], -32000);
    }

    #[tokio::test]
    async fn test_http_error_without_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = McpClient::new(server.uri());
        let err = client.call_tool("list_employees", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolCallError::Http { status: 502, .. }));
        assert_eq!(err.to_tool_result()["details"], "bad gateway");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = McpClient::new("http://127.0.0.1:9/mcp/");

        let err = client.call_tool("list_employees", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolCallError::Transport(_)));

        let payload = err.to_tool_result();
        assert!(payload["error"]
            .as_str()
            .unwrap()
            .starts_with("Transport error calling MCP server: "));
    }

    #[tokio::test]
    async fn test_list_tools() {
        let server = MockServer::start().await;
        let tools = serde_json::to_value(catalog::employee_tools()).unwrap();
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "mcp/tool/list"})))
            .respond_with(respond_with(json!({ "result": tools })))
            .mount(&server)
            .await;

        let client = McpClient::new(server.uri());
        let listed = client.list_tools().await.unwrap();
        assert_eq!(listed, catalog::employee_tools());
    }
}
