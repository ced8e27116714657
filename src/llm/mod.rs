pub mod gemini;
pub mod provider;
pub mod types;

pub use gemini::GeminiProvider;
pub use provider::LlmProvider;
pub use types::{
    ContentBlock, Message, MessageContent, MessageResponse, StopReason, ToolDefinition,
    ToolInputSchema, Usage,
};
