//! Tool system
//!
//! This module provides:
//! - `Tool` trait - Interface for implementing tools
//! - `ToolResult` - Result type for tool execution
//! - `ToolRegistry` - Ordered set of tools available to an agent
//! - `FunctionTool` - Adapter for async closures returning a string
//! - `common` - Built-in tools (location, breaking news)

mod function_tool;
mod registry;
mod tool;

/// Common/built-in tools
pub mod common;

pub use function_tool::{function_tool, FunctionTool};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolResult};

pub use common::{BreakingNewsTool, LocationTool};
