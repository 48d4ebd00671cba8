//! Hosted model abstraction.

use crate::conversation::Conversation;
use roster_mcp::protocol::ToolSchema;
use serde_json::Value;

/// A tool invocation requested by the model.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub args: Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, args: Value) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// A complete model response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelReply {
    /// Concatenated text parts, trimmed.
    pub text: String,
    /// Tool calls, in the order the model requested them.
    pub tool_calls: Vec<ToolCall>,
}

impl ModelReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            text: String::new(),
            tool_calls,
        }
    }

    #[inline]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
}

/// A language model that can answer a conversation and request tool calls.
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends the full transcript and the available tools, returning the reply.
    async fn generate(
        &self,
        conversation: &Conversation,
        tools: &[ToolSchema],
    ) -> Result<ModelReply, ModelError>;
}
