//! Runner
//!
//! Drives one run: Input → LLM → Tools/Handoffs → LLM → ... → final answer.
//! The model makes every decision; the runner only executes what it asks for
//! and records each step as a [`RunItem`].

use std::sync::Arc;

use crate::core::{FrameworkError, FrameworkResult};
use crate::llm::{ContentBlock, Message, MessageResponse, StopReason, Usage};
use crate::tools::ToolResult;

use super::agent::Agent;
use super::config::RunConfig;
use super::items::{RunItem, RunResult};

const MULTIPLE_HANDOFFS_MESSAGE: &str = "Multiple handoffs detected, ignoring this one.";

/// Executes agents against an input
///
/// # Example
///
/// ```ignore
/// let config = RunConfig::new(llm);
/// let result = Runner::run(&agent, "What is photosynthesis?", &config).await?;
/// println!("{}: {}", result.last_agent.name(), result.final_output);
/// ```
pub struct Runner;

impl Runner {
    /// Run `starting_agent` against `input` until some agent answers without
    /// calling a tool.
    pub async fn run(
        starting_agent: &Arc<Agent>,
        input: impl Into<String>,
        config: &RunConfig,
    ) -> FrameworkResult<RunResult> {
        let input: String = input.into();
        tracing::info!(
            "[Runner] Starting run with agent {} (max turns {})",
            starting_agent.name(),
            config.max_turns
        );

        let mut history = vec![Message::user(input)];
        let mut current = Arc::clone(starting_agent);
        let mut new_items = Vec::new();
        let mut usage = Usage::default();

        for turn in 1..=config.max_turns {
            let tool_definitions = current.tool_definitions();
            tracing::info!(
                "[Runner] Turn {}: calling LLM as {} with {} messages, {} tools",
                turn,
                current.name(),
                history.len(),
                tool_definitions.len()
            );

            let response = config
                .llm
                .send_with_tools_and_system(
                    history.clone(),
                    Some(current.instructions()),
                    tool_definitions,
                )
                .await
                .map_err(FrameworkError::Provider)?;

            tracing::info!("[Runner] LLM response: stop_reason={:?}", response.stop_reason);
            add_usage(&mut usage, &response.usage);

            let text = response.text();
            if !text.is_empty() {
                new_items.push(RunItem::MessageOutput {
                    agent: current.name().to_string(),
                    text: text.clone(),
                });
            }

            if !response.has_tool_use() {
                match response.stop_reason {
                    Some(StopReason::MaxTokens) => {
                        tracing::warn!("[Runner] Response truncated (max tokens)")
                    }
                    Some(StopReason::Refusal) => tracing::warn!("[Runner] Model refused to respond"),
                    _ => {}
                }
                tracing::info!("[Runner] Final answer from {}", current.name());
                return Ok(RunResult {
                    final_output: text,
                    last_agent: current,
                    new_items,
                    usage,
                });
            }

            let (tool_results, next_agent) =
                Self::process_tool_uses(&current, &response, &mut new_items).await?;

            history.push(Message::assistant_with_blocks(response.content));
            history.push(Message::user_with_blocks(tool_results));

            if let Some(next) = next_agent {
                tracing::info!("[Runner] Handoff: {} -> {}", current.name(), next.name());
                current = next;
            }
        }

        tracing::warn!("[Runner] Max turns ({}) reached", config.max_turns);
        Err(FrameworkError::MaxTurnsExceeded(config.max_turns))
    }

    /// Execute every tool use in `response`, in order.
    ///
    /// Returns the tool result blocks for the next request and the agent to
    /// switch to, if the model took a handoff.
    async fn process_tool_uses(
        current: &Arc<Agent>,
        response: &MessageResponse,
        new_items: &mut Vec<RunItem>,
    ) -> FrameworkResult<(Vec<ContentBlock>, Option<Arc<Agent>>)> {
        let agent_name = current.name().to_string();
        let mut tool_results = Vec::new();
        let mut next_agent: Option<Arc<Agent>> = None;

        for (id, name, input) in response.tool_uses() {
            if let Some(handoff) = current.find_handoff(name) {
                new_items.push(RunItem::HandoffCall {
                    agent: agent_name.clone(),
                    call_id: id.to_string(),
                    tool: name.to_string(),
                });

                if next_agent.is_some() {
                    tracing::warn!("[Runner] Ignoring extra handoff {}", name);
                    tool_results.push(ContentBlock::tool_result(id, MULTIPLE_HANDOFFS_MESSAGE, true));
                    continue;
                }

                new_items.push(RunItem::HandoffOutput {
                    call_id: id.to_string(),
                    source: agent_name.clone(),
                    target: handoff.target().name().to_string(),
                });
                tool_results.push(ContentBlock::tool_result(id, handoff.transfer_message(), false));
                next_agent = Some(Arc::clone(handoff.target()));
            } else if current.tools().contains(name) {
                tracing::info!("[Runner] Tool use: {} ({})", name, id);
                new_items.push(RunItem::ToolCall {
                    agent: agent_name.clone(),
                    call_id: id.to_string(),
                    tool: name.to_string(),
                    arguments: input.clone(),
                });

                let result = match current.tools().execute(name, input).await {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::error!("[Runner] Tool {} failed: {:#}", name, e);
                        ToolResult::error(format!("Tool execution failed: {}", e))
                    }
                };

                new_items.push(RunItem::ToolCallOutput {
                    agent: agent_name.clone(),
                    call_id: id.to_string(),
                    output: result.output.clone(),
                    is_error: result.is_error,
                });
                tool_results.push(ContentBlock::tool_result(id, result.output, result.is_error));
            } else {
                return Err(FrameworkError::model_behavior(format!(
                    "Tool {} not found in agent {}",
                    name, agent_name
                )));
            }
        }

        Ok((tool_results, next_agent))
    }
}

fn add_usage(total: &mut Usage, turn: &Usage) {
    total.input_tokens += turn.input_tokens;
    total.output_tokens += turn.output_tokens;
    if let Some(thoughts) = turn.thoughts_token_count {
        *total.thoughts_token_count.get_or_insert(0) += thoughts;
    }
}
