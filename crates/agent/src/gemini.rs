//! Vertex AI Gemini provider using the `generateContent` endpoint.

use crate::conversation::{Conversation, Turn};
use crate::model::{ChatModel, ModelError, ModelReply, ToolCall};
use roster_mcp::protocol::ToolSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Builder for [`GeminiConfig`].
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfigBuilder {
    project: String,
    location: String,
    access_token: String,
    model: Option<String>,
    base_url: Option<String>,
}

impl GeminiConfigBuilder {
    /// Creates a builder for the given project and location.
    pub fn new<S: Into<String>>(project: S, location: S, access_token: S) -> Self {
        Self {
            project: project.into(),
            location: location.into(),
            access_token: access_token.into(),
            model: None,
            base_url: None,
        }
    }

    /// Sets the model to use.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets a custom base URL in place of the regional Vertex endpoint.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> GeminiConfig {
        let base_url = self.base_url.unwrap_or_else(|| {
            if self.location == "global" {
                "https://aiplatform.googleapis.com".to_string()
            } else {
                format!("https://{}-aiplatform.googleapis.com", self.location)
            }
        });

        GeminiConfig {
            project: self.project,
            location: self.location,
            access_token: self.access_token,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Debug for GeminiConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfigBuilder")
            .field("project", &self.project)
            .field("location", &self.location)
            .field("access_token", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Configuration for the Gemini provider.
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    project: String,
    location: String,
    access_token: String,
    model: String,
    base_url: String,
}

impl GeminiConfig {
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.base_url, self.project, self.location, self.model
        )
    }
}

impl Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("project", &self.project)
            .field("location", &self.location)
            .field("access_token", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Gemini chat model.
#[derive(Clone, Debug)]
pub struct GeminiModel {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiModel {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl ChatModel for GeminiModel {
    async fn generate(
        &self,
        conversation: &Conversation,
        tools: &[ToolSchema],
    ) -> Result<ModelReply, ModelError> {
        let request = GenerateContentRequest::new(conversation, tools);
        tracing::debug!(
            model = %self.config.model,
            contents = request.contents.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.access_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Model request failed");
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        body.into_reply()
    }
}

// Wire format

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentRequest {
    fn new(conversation: &Conversation, tools: &[ToolSchema]) -> Self {
        let mut contents: Vec<Content> = Vec::new();

        for turn in conversation.turns() {
            match turn {
                Turn::User(text) => contents.push(Content {
                    role: "user".to_string(),
                    parts: vec![Part {
                        text: Some(text.clone()),
                        ..Default::default()
                    }],
                }),
                // Vertex rejects empty text parts
                Turn::Model { text, tool_calls } if text.is_empty() && tool_calls.is_empty() => {}
                Turn::Model { text, tool_calls } => {
                    let mut parts = Vec::new();
                    if !text.is_empty() {
                        parts.push(Part {
                            text: Some(text.clone()),
                            ..Default::default()
                        });
                    }
                    parts.extend(tool_calls.iter().map(|call| Part {
                        function_call: Some(FunctionCall {
                            name: call.name.clone(),
                            args: call.args.clone(),
                        }),
                        ..Default::default()
                    }));
                    contents.push(Content {
                        role: "model".to_string(),
                        parts,
                    });
                }
                Turn::ToolResult { name, content } => {
                    let part = Part {
                        function_response: Some(FunctionResponse {
                            name: name.clone(),
                            response: serde_json::json!({ "result": content }),
                        }),
                        ..Default::default()
                    };

                    // Results answering one model turn travel together
                    match contents.last_mut() {
                        Some(last)
                            if last.role == "user"
                                && last.parts.iter().all(|p| p.function_response.is_some()) =>
                        {
                            last.parts.push(part)
                        }
                        _ => contents.push(Content {
                            role: "user".to_string(),
                            parts: vec![part],
                        }),
                    }
                }
            }
        }

        let tools = if tools.is_empty() {
            Vec::new()
        } else {
            vec![GeminiTool {
                function_declarations: tools
                    .iter()
                    .map(|tool| FunctionDeclaration {
                        name: tool.name.clone(),
                        description: tool.description.clone(),
                        parameters: gemini_schema(&tool.parameters),
                    })
                    .collect(),
            }]
        };

        Self { contents, tools }
    }
}

impl GenerateContentResponse {
    fn into_reply(self) -> Result<ModelReply, ModelError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(ModelError::InvalidResponse(
                "response has no candidates".to_string(),
            ));
        };

        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
        let mut text = String::new();
        let mut tool_calls = Vec::new();

        for part in parts {
            if let Some(t) = part.text {
                text.push_str(&t);
            }
            if let Some(call) = part.function_call {
                let args = match call.args {
                    Value::Null => Value::Object(Map::new()),
                    args => args,
                };
                tool_calls.push(ToolCall::new(call.name, args));
            }
        }

        Ok(ModelReply {
            text: text.trim().to_string(),
            tool_calls,
        })
    }
}

/// Rewrite JSON-schema `type` names into Gemini's upper-case enum.
fn gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        ("type", Value::String(t)) => Value::String(t.to_uppercase()),
                        _ => gemini_schema(value),
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(gemini_schema).collect()),
        other => other.clone(),
    }
}
