//! The agent turn loop.

use crate::conversation::Conversation;
use crate::mcp_client::McpClient;
use crate::model::{ChatModel, ModelError};
use roster_mcp::catalog;
use roster_mcp::protocol::ToolSchema;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Model request failed: {0}")]
    Model(#[from] ModelError),
}

/// One interactive session: a model, the tool server, and the transcript.
pub struct Agent {
    model: Box<dyn ChatModel>,
    mcp: McpClient,
    tools: Vec<ToolSchema>,
    conversation: Conversation,
}

impl Agent {
    /// Creates an agent offering the employee tools to the model.
    pub fn new(model: impl ChatModel + 'static, mcp: McpClient) -> Self {
        Self {
            model: Box::new(model),
            mcp,
            tools: catalog::employee_tools(),
            conversation: Conversation::new(),
        }
    }

    #[inline]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    #[inline]
    pub fn tools(&self) -> &[ToolSchema] {
        &self.tools
    }

    /// Runs one user turn and returns the model's final text.
    ///
    /// Tool calls run one at a time in the order the model requested them.
    /// The first failing call ends execution for the turn: its error becomes
    /// the tool result and each remaining call is answered as skipped.
    pub async fn run_turn(&mut self, prompt: &str) -> Result<String, AgentError> {
        self.conversation.push_user(prompt);

        let reply = self.model.generate(&self.conversation, &self.tools).await?;
        if !reply.has_tool_calls() {
            self.conversation.push_model(reply.text.clone(), Vec::new());
            return Ok(reply.text);
        }

        tracing::info!(count = reply.tool_calls.len(), "Model requested tool calls");
        let calls = reply.tool_calls.clone();
        self.conversation.push_model(reply.text, reply.tool_calls);

        let mut failed = false;
        for call in calls {
            let content = if failed {
                json!({ "error": "Skipped because an earlier tool call in this turn failed." })
            } else {
                match self.mcp.call_tool(&call.name, call.args).await {
                    Ok(result) => result,
                    Err(err) => {
                        tracing::warn!(tool = %call.name, "Tool call failed: {}", err);
                        failed = true;
                        err.to_tool_result()
                    }
                }
            };
            self.conversation.push_tool_result(call.name, content);
        }

        let answer = self.model.generate(&self.conversation, &self.tools).await?;
        if answer.has_tool_calls() {
            // Only one round of tool execution per turn
            tracing::warn!(
                count = answer.tool_calls.len(),
                "Ignoring tool calls in the final answer"
            );
        }
        self.conversation.push_model(answer.text.clone(), Vec::new());

        Ok(answer.text)
    }
}
