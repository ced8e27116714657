//! Parameterless tools backed by an async closure returning a string.
//!
//! ```ignore
//! let tool = function_tool("get_time", "Returns the current time.", || async {
//!     "12:00".to_string()
//! });
//! ```

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::tool::{Tool, ToolResult};

type StringFuture = Pin<Box<dyn Future<Output = String> + Send>>;

/// A tool whose whole behavior is "await a closure, return its string"
pub struct FunctionTool {
    name: String,
    description: String,
    func: Box<dyn Fn() -> StringFuture + Send + Sync>,
}

impl FunctionTool {
    pub fn new<F, Fut>(name: impl Into<String>, description: impl Into<String>, func: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = String> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            func: Box::new(move || Box::pin(func())),
        }
    }
}

/// Shorthand for [`FunctionTool::new`]
pub fn function_tool<F, Fut>(
    name: impl Into<String>,
    description: impl Into<String>,
    func: F,
) -> FunctionTool
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = String> + Send + 'static,
{
    FunctionTool::new(name, description, func)
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, _input: &Value) -> Result<ToolResult> {
        Ok(ToolResult::success((self.func)().await))
    }
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .finish()
    }
}
