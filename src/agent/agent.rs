//! Agent definition
//!
//! An agent is a named bundle of instructions, tools and handoff targets.
//! Build it with the `with_*` methods, then share it behind an `Arc`; it is
//! never mutated after that.
//!
//! ```ignore
//! let specialist = Arc::new(Agent::new("PlantAgent", "You are a plant biology expert."));
//!
//! let generalist = Agent::new("NewsLocationAgent", "You answer questions about news.")
//!     .with_tool(BreakingNewsTool::new(client))
//!     .with_handoff(specialist);
//! ```

use std::sync::Arc;

use crate::llm::ToolDefinition;
use crate::tools::{Tool, ToolRegistry};

use super::handoff::Handoff;

pub struct Agent {
    name: String,
    instructions: String,
    handoff_description: Option<String>,
    tools: ToolRegistry,
    handoffs: Vec<Handoff>,
}

impl Agent {
    /// Create an agent with no tools and no handoffs
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            handoff_description: None,
            tools: ToolRegistry::new(),
            handoffs: Vec::new(),
        }
    }

    /// Describe this agent to agents that can hand off to it
    pub fn with_handoff_description(mut self, description: impl Into<String>) -> Self {
        self.handoff_description = Some(description.into());
        self
    }

    /// Add a tool
    pub fn with_tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    /// Allow handing off to `target`
    pub fn with_handoff(mut self, target: Arc<Agent>) -> Self {
        self.handoffs.push(Handoff::new(target));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn handoff_description(&self) -> Option<&str> {
        self.handoff_description.as_deref()
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn handoffs(&self) -> &[Handoff] {
        &self.handoffs
    }

    /// Find the handoff exposed under `tool_name`
    pub fn find_handoff(&self, tool_name: &str) -> Option<&Handoff> {
        self.handoffs.iter().find(|h| h.tool_name() == tool_name)
    }

    /// Everything the model may call: tools first, then handoffs
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .get_definitions()
            .into_iter()
            .chain(self.handoffs.iter().map(Handoff::definition))
            .collect()
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field(
                "instructions",
                &format!("{}...", self.instructions.chars().take(50).collect::<String>()),
            )
            .field("tools", &self.tools)
            .field("handoffs", &self.handoffs)
            .finish()
    }
}
