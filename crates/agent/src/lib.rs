//! Conversational client that lets a hosted model call the employee tools.

pub mod agent;
pub mod conversation;
pub mod gemini;
pub mod mcp_client;
pub mod model;

pub use agent::{Agent, AgentError};
pub use conversation::{Conversation, Turn};
pub use gemini::{GeminiConfig, GeminiConfigBuilder, GeminiModel};
pub use mcp_client::{McpClient, ToolCallError};
pub use model::{ChatModel, ModelError, ModelReply, ToolCall};
