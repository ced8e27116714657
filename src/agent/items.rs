//! Run items and results

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::llm::Usage;

use super::agent::Agent;

/// One step of a run, in the order it happened
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunItem {
    /// Text the model produced
    MessageOutput { agent: String, text: String },

    /// The model asked to run a tool
    ToolCall {
        agent: String,
        call_id: String,
        tool: String,
        arguments: Value,
    },

    /// What the tool returned
    ToolCallOutput {
        agent: String,
        call_id: String,
        output: String,
        is_error: bool,
    },

    /// The model asked to hand off
    HandoffCall {
        agent: String,
        call_id: String,
        tool: String,
    },

    /// Control moved from `source` to `target`
    HandoffOutput {
        call_id: String,
        source: String,
        target: String,
    },
}

impl RunItem {
    /// Name of the agent that was active when this item was produced
    pub fn agent_name(&self) -> &str {
        match self {
            RunItem::MessageOutput { agent, .. }
            | RunItem::ToolCall { agent, .. }
            | RunItem::ToolCallOutput { agent, .. }
            | RunItem::HandoffCall { agent, .. } => agent,
            RunItem::HandoffOutput { source, .. } => source,
        }
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Text of the final answer
    pub final_output: String,

    /// The agent that produced the final answer
    pub last_agent: Arc<Agent>,

    /// Everything that happened, in order
    pub new_items: Vec<RunItem>,

    /// Token usage summed over every model call
    pub usage: Usage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_serialize_with_type_tag() {
        let item = RunItem::HandoffOutput {
            call_id: "call_1".into(),
            source: "NewsLocationAgent".into(),
            target: "PlantAgent".into(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "handoff_output");
        assert_eq!(item.agent_name(), "NewsLocationAgent");
    }
}
