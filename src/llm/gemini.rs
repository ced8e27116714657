//! Gemini API client
//!
//! This module provides a direct HTTP client for the Google Gemini API,
//! translating between the crate's internal message types and the Gemini
//! `generateContent` format.
//!
//! # Authentication
//!
//! Uses a Gemini API key, sent in the `x-goog-api-key` header.
//!
//! ```ignore
//! let settings = Settings::from_env()?;
//! let llm = GeminiProvider::from_settings(&settings);
//!
//! // With explicit API key
//! let llm = GeminiProvider::new("AIza...").with_model("gemini-2.0-flash");
//! ```

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::provider::LlmProvider;
use super::types::{
    ContentBlock, Message, MessageContent, MessageResponse, StopReason, ToolDefinition, Usage,
};
use crate::config::Settings;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

// ============================================================================
// Gemini-specific request/response types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<GeminiToolConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiContent {
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<GeminiFunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<GeminiFunctionResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thought_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<GeminiFunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct GeminiFunctionDeclaration {
    name: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiToolConfig {
    function_calling_config: GeminiFunctionCallingConfig,
}

#[derive(Debug, Serialize)]
struct GeminiFunctionCallingConfig {
    mode: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

// Response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    usage_metadata: Option<GeminiUsageMetadata>,
    model_version: Option<String>,
    response_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    thoughts_token_count: Option<u32>,
}

// ============================================================================
// GeminiProvider
// ============================================================================

/// Google Gemini LLM provider
///
/// Translates between the crate's internal message types and the Gemini API
/// format. Translation happens entirely at the boundary.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    api_base: String,
    /// Maps tool_use_id -> thought_signature.
    /// Gemini 3 requires thought signatures to be sent back with function calls.
    thought_signatures: Arc<Mutex<HashMap<String, String>>>,
}

impl GeminiProvider {
    /// Create a new Gemini provider with a specific API key and default model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            api_base: DEFAULT_API_BASE.to_string(),
            thought_signatures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a provider from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        tracing::info!("[Gemini] Using model: {}", settings.model);
        tracing::debug!("[Gemini] Max tokens: {}", settings.max_tokens);

        let provider = Self::new(settings.gemini_api_key.clone())
            .with_model(settings.model.clone())
            .with_max_tokens(settings.max_tokens);

        match &settings.api_base {
            Some(base) => provider.with_api_base(base.clone()),
            None => provider,
        }
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the max tokens for responses
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Override the API base URL (proxies, local test servers)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    // ========================================================================
    // Format conversion: Internal -> Gemini
    // ========================================================================

    /// Convert internal messages to Gemini format
    async fn convert_messages(&self, messages: &[Message]) -> Vec<GeminiContent> {
        // functionResponse needs the function name, but tool results only carry the
        // id of the tool use, which lives in an earlier assistant message.
        let tool_use_names: HashMap<&str, &str> = messages
            .iter()
            .filter_map(|m| m.blocks())
            .flatten()
            .filter_map(|b| b.as_tool_use())
            .map(|(id, name, _)| (id, name))
            .collect();

        let mut gemini_contents: Vec<GeminiContent> = Vec::new();

        for msg in messages {
            let parts = self.convert_content_to_parts(&msg.content, &tool_use_names).await;
            if parts.is_empty() {
                continue;
            }

            // Function responses always go back as "user" content
            let has_function_response = parts.iter().any(|p| p.function_response.is_some());
            let role = match msg.role.as_str() {
                _ if has_function_response => "user",
                "assistant" => "model",
                _ => "user",
            };

            gemini_contents.push(GeminiContent {
                role: role.to_string(),
                parts,
            });
        }

        Self::merge_consecutive_roles(gemini_contents)
    }

    /// Merge consecutive messages with the same role (Gemini requires alternation)
    fn merge_consecutive_roles(contents: Vec<GeminiContent>) -> Vec<GeminiContent> {
        let mut merged: Vec<GeminiContent> = Vec::new();

        for content in contents {
            if let Some(last) = merged.last_mut() {
                if last.role == content.role {
                    last.parts.extend(content.parts);
                    continue;
                }
            }
            merged.push(content);
        }

        merged
    }

    /// Convert internal content to Gemini parts
    async fn convert_content_to_parts(
        &self,
        content: &MessageContent,
        tool_use_names: &HashMap<&str, &str>,
    ) -> Vec<GeminiPart> {
        let blocks = match content {
            MessageContent::Text(text) => {
                return vec![GeminiPart {
                    text: Some(text.clone()),
                    ..Default::default()
                }];
            }
            MessageContent::Blocks(blocks) => blocks,
        };

        let mut parts = Vec::new();
        for block in blocks {
            match block {
                ContentBlock::Text { text } => {
                    if !text.is_empty() {
                        parts.push(GeminiPart {
                            text: Some(text.clone()),
                            ..Default::default()
                        });
                    }
                }
                ContentBlock::ToolUse { id, name, input } => {
                    let sig = self.thought_signatures.lock().await.get(id).cloned();
                    let args = if input.is_null() { json!({}) } else { input.clone() };
                    parts.push(GeminiPart {
                        function_call: Some(GeminiFunctionCall {
                            name: name.clone(),
                            args,
                        }),
                        thought_signature: sig,
                        ..Default::default()
                    });
                }
                ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                    is_error,
                } => {
                    let name = tool_use_names
                        .get(tool_use_id.as_str())
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| tool_use_id.clone());

                    let response = if *is_error {
                        json!({ "error": content })
                    } else {
                        json!({ "result": content })
                    };

                    parts.push(GeminiPart {
                        function_response: Some(GeminiFunctionResponse { name, response }),
                        ..Default::default()
                    });
                }
            }
        }

        parts
    }

    /// Convert internal tool definitions to Gemini function declarations
    fn convert_tools(tools: &[ToolDefinition]) -> Option<Vec<GeminiTool>> {
        if tools.is_empty() {
            return None;
        }

        let declarations = tools
            .iter()
            .map(|tool| {
                let schema = &tool.input_schema;
                // Gemini rejects OBJECT parameters with an empty property map
                let parameters = schema.properties.as_ref().map(|props| {
                    let mut params = json!({
                        "type": schema.schema_type,
                        "properties": Self::clean_schema_for_gemini(props),
                    });
                    if let Some(ref req) = schema.required {
                        params["required"] = json!(req);
                    }
                    params
                });

                GeminiFunctionDeclaration {
                    name: tool.name.clone(),
                    description: tool.description.clone(),
                    parameters,
                }
            })
            .collect();

        Some(vec![GeminiTool {
            function_declarations: declarations,
        }])
    }

    /// Strip JSON Schema fields that Gemini's function declarations reject
    fn clean_schema_for_gemini(value: &Value) -> Value {
        const UNSUPPORTED_FIELDS: &[&str] = &[
            "additionalProperties",
            "$schema",
            "definitions",
            "$ref",
            "patternProperties",
            "if",
            "then",
            "else",
            "allOf",
            "anyOf",
            "oneOf",
            "not",
            "default",
        ];

        match value {
            Value::Object(map) => {
                let cleaned = map
                    .iter()
                    .filter(|(key, _)| !UNSUPPORTED_FIELDS.contains(&key.as_str()))
                    .map(|(key, val)| (key.clone(), Self::clean_schema_for_gemini(val)))
                    .collect();
                Value::Object(cleaned)
            }
            Value::Array(arr) => Value::Array(arr.iter().map(Self::clean_schema_for_gemini).collect()),
            other => other.clone(),
        }
    }

    /// Build a GeminiRequest from internal types
    async fn build_request(
        &self,
        messages: &[Message],
        system: Option<&str>,
        tools: &[ToolDefinition],
    ) -> GeminiRequest {
        let contents = self.convert_messages(messages).await;
        let system_instruction = system.map(|text| GeminiSystemInstruction {
            parts: vec![GeminiPart {
                text: Some(text.to_string()),
                ..Default::default()
            }],
        });
        let gemini_tools = Self::convert_tools(tools);
        let tool_config = gemini_tools.as_ref().map(|_| GeminiToolConfig {
            function_calling_config: GeminiFunctionCallingConfig {
                mode: "AUTO".to_string(),
            },
        });

        GeminiRequest {
            contents,
            system_instruction,
            tools: gemini_tools,
            tool_config,
            generation_config: Some(GeminiGenerationConfig {
                max_output_tokens: Some(self.max_tokens),
            }),
        }
    }

    // ========================================================================
    // Format conversion: Gemini -> Internal
    // ========================================================================

    /// Convert Gemini response to internal MessageResponse format
    async fn convert_response(&self, gemini_resp: GeminiResponse) -> Result<MessageResponse> {
        let candidate = gemini_resp
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .context("No candidates in Gemini response")?;

        let parts = candidate
            .content
            .as_ref()
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[]);
        let content = self.convert_gemini_parts_to_blocks(parts).await;

        let has_tool_use = content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }));
        let stop_reason = if has_tool_use {
            Some(StopReason::ToolUse)
        } else {
            candidate.finish_reason.as_deref().map(|r| match r {
                "MAX_TOKENS" => StopReason::MaxTokens,
                "SAFETY" | "RECITATION" => StopReason::Refusal,
                _ => StopReason::EndTurn,
            })
        };

        let usage = gemini_resp
            .usage_metadata
            .as_ref()
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
                thoughts_token_count: u.thoughts_token_count,
            })
            .unwrap_or_default();

        Ok(MessageResponse {
            id: gemini_resp
                .response_id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            content,
            model: gemini_resp.model_version.unwrap_or_else(|| self.model.clone()),
            stop_reason,
            usage,
        })
    }

    /// Convert Gemini parts to internal ContentBlocks, caching thought signatures
    async fn convert_gemini_parts_to_blocks(&self, parts: &[GeminiPart]) -> Vec<ContentBlock> {
        let mut blocks = Vec::new();

        for part in parts {
            if let Some(ref text) = part.text {
                // Thought summaries are not part of the answer
                if part.thought != Some(true) && !text.is_empty() {
                    blocks.push(ContentBlock::text(text.clone()));
                }
            }

            if let Some(ref fc) = part.function_call {
                // Ids must stay unique across turns so tool results can be matched
                let tool_id = format!("call_{}", uuid::Uuid::new_v4().simple());

                if let Some(ref sig) = part.thought_signature {
                    self.thought_signatures
                        .lock()
                        .await
                        .insert(tool_id.clone(), sig.clone());
                }

                blocks.push(ContentBlock::tool_use(tool_id, fc.name.clone(), fc.args.clone()));
            }
        }

        blocks
    }

    // ========================================================================
    // API methods
    // ========================================================================

    fn api_url(&self, operation: &str) -> String {
        format!("{}/models/{}:{}", self.api_base, self.model, operation)
    }

    /// Send a non-streaming request to the Gemini API
    async fn send_gemini_request(&self, request: &GeminiRequest) -> Result<GeminiResponse> {
        let url = self.api_url("generateContent");

        let request_json =
            serde_json::to_string(request).context("Failed to serialize Gemini request")?;
        tracing::debug!("[Gemini] Request JSON: {}", request_json);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .body(request_json)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read Gemini response body")?;

        tracing::debug!("[Gemini] Response status: {}", status);
        tracing::debug!("[Gemini] Response body: {}", response_text);

        if !status.is_success() {
            tracing::error!("[Gemini] API error: {} - {}", status, response_text);
            anyhow::bail!("Gemini API error ({}): {}", status, response_text);
        }

        serde_json::from_str(&response_text).context("Failed to parse Gemini API response")
    }
}

// ============================================================================
// LlmProvider implementation
// ============================================================================

#[async_trait::async_trait]
impl LlmProvider for GeminiProvider {
    async fn send_with_tools_and_system(
        &self,
        messages: Vec<Message>,
        system: Option<&str>,
        tools: Vec<ToolDefinition>,
    ) -> Result<MessageResponse> {
        tracing::info!("[Gemini] Sending message with tools");
        tracing::debug!("[Gemini] Messages count: {}", messages.len());
        tracing::debug!("[Gemini] Tools count: {}", tools.len());

        let request = self.build_request(&messages, system, &tools).await;
        let gemini_response = self.send_gemini_request(&request).await?;
        self.convert_response(gemini_response).await
    }

    fn model(&self) -> String {
        self.model.clone()
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}
