// Tool trait and registry

use crate::protocol::{JsonRpcError, ToolSchema};
use roster_sdk::RosterError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Failure while executing a tool
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Arguments could not be translated into a REST call
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// The REST API call failed
    #[error("{}", upstream_message(.0))]
    Upstream(#[from] RosterError),
}

fn upstream_message(err: &RosterError) -> String {
    match err {
        RosterError::Api { status, body, .. } => {
            format!("Backend API Error: {} - {}", status, body)
        }
        other => format!("Backend API Error: {}", other),
    }
}

impl From<ToolError> for JsonRpcError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::InvalidParams(message) => JsonRpcError::invalid_params(message),
            ToolError::Upstream(_) => JsonRpcError::upstream(err.to_string()),
        }
    }
}

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema
    fn schema(&self) -> ToolSchema;

    /// Execute the tool, returning the upstream response body
    async fn execute(&self, arguments: Value) -> Result<Value, ToolError>;
}

/// Tool registry for managing available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.schema().name;
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool schemas in registration order
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.schema())
            .collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: Value, required: Vec<&str>) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_integer(description: &str) -> Value {
    serde_json::json!({
        "type": "integer",
        "description": description
    })
}
