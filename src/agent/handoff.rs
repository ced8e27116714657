//! Handoffs
//!
//! A handoff is offered to the model as a parameterless tool. When the model
//! calls it, the runner makes the target the active agent.

use std::sync::Arc;

use crate::llm::{ToolDefinition, ToolInputSchema};

use super::agent::Agent;

/// A permitted transfer of control to another agent
#[derive(Clone)]
pub struct Handoff {
    target: Arc<Agent>,
    tool_name: String,
    tool_description: String,
}

impl Handoff {
    pub fn new(target: Arc<Agent>) -> Self {
        let tool_name = handoff_tool_name(target.name());
        let tool_description = match target.handoff_description() {
            Some(desc) => format!(
                "Handoff to the {} agent to handle the request. {}",
                target.name(),
                desc
            ),
            None => format!("Handoff to the {} agent to handle the request.", target.name()),
        };

        Self {
            target,
            tool_name,
            tool_description,
        }
    }

    pub fn target(&self) -> &Arc<Agent> {
        &self.target
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.tool_name.clone(),
            description: self.tool_description.clone(),
            input_schema: ToolInputSchema::new(),
        }
    }

    /// Tool result returned to the model once the handoff is taken
    pub fn transfer_message(&self) -> String {
        serde_json::json!({ "assistant": self.target.name() }).to_string()
    }
}

impl std::fmt::Debug for Handoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handoff")
            .field("target", &self.target.name())
            .field("tool_name", &self.tool_name)
            .finish()
    }
}

/// `transfer_to_<name>`, with the name lowercased and anything outside
/// `[a-z0-9_]` replaced by `_`
pub fn handoff_tool_name(agent_name: &str) -> String {
    let normalized: String = agent_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("transfer_to_{}", normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handoff_tool_name() {
        assert_eq!(handoff_tool_name("PlantAgent"), "transfer_to_plantagent");
        assert_eq!(handoff_tool_name("Math Tutor"), "transfer_to_math_tutor");
        assert_eq!(handoff_tool_name("q&a-bot"), "transfer_to_q_a_bot");
    }

    #[test]
    fn test_definition_uses_handoff_description() {
        let plain = Handoff::new(Arc::new(Agent::new("PlantAgent", "...")));
        assert_eq!(
            plain.definition().description,
            "Handoff to the PlantAgent agent to handle the request."
        );

        let described = Handoff::new(Arc::new(
            Agent::new("PlantAgent", "...").with_handoff_description("Explains photosynthesis."),
        ));
        assert_eq!(
            described.definition().description,
            "Handoff to the PlantAgent agent to handle the request. Explains photosynthesis."
        );
        assert!(described.definition().input_schema.properties.is_none());
    }

    #[test]
    fn test_transfer_message() {
        let handoff = Handoff::new(Arc::new(Agent::new("PlantAgent", "...")));
        assert_eq!(handoff.transfer_message(), r#"{"assistant":"PlantAgent"}"#);
    }
}
