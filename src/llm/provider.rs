//! LLM Provider trait
//!
//! Abstracts the model so the runner can be driven by Gemini in production and
//! by a scripted provider in tests.

use anyhow::Result;

use super::types::{Message, MessageResponse, ToolDefinition};

/// Trait for LLM providers that can drive a [`Runner`](crate::agent::Runner).
///
/// All providers work with the same internal message types. Providers that use
/// a different wire format translate internally.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a request with tools and a system prompt, returning the full response.
    async fn send_with_tools_and_system(
        &self,
        messages: Vec<Message>,
        system: Option<&str>,
        tools: Vec<ToolDefinition>,
    ) -> Result<MessageResponse>;

    /// Get the current model name.
    fn model(&self) -> String;

    /// Get the provider name (e.g., "gemini").
    fn provider_name(&self) -> &str;
}
