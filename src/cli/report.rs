//! Run report
//!
//! Renders a [`RunResult`] as the fixed stdout report: separator, terminal
//! agent, one line per run item, final answer.

use std::io::{self, Write};

use colored::*;

use crate::agent::{RunItem, RunResult};

const SEPARATOR_WIDTH: usize = 50;

/// Writes run reports with colored item lines
pub struct Report {
    agent_color: Color,
    tool_color: Color,
    handoff_color: Color,
}

impl Report {
    pub fn new() -> Self {
        Self {
            agent_color: Color::Green,
            tool_color: Color::Magenta,
            handoff_color: Color::Cyan,
        }
    }

    /// Print the report to stdout
    pub fn print(&self, result: &RunResult) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write(&mut out, result)?;
        out.flush()
    }

    /// Write the report to any writer
    pub fn write<W: Write>(&self, out: &mut W, result: &RunResult) -> io::Result<()> {
        writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH))?;
        writeln!(out, "Result:  {}", result.last_agent.name())?;
        for (index, item) in result.new_items.iter().enumerate() {
            writeln!(out, "{:>3}. {}", index + 1, self.format_item(item))?;
        }
        writeln!(out, "Result:  {}", result.final_output)
    }

    /// One line describing a run item
    pub fn format_item(&self, item: &RunItem) -> String {
        match item {
            RunItem::MessageOutput { agent, text } => format!(
                "{} message: {}",
                format!("[{}]", agent).color(self.agent_color).bold(),
                text.trim()
            ),
            RunItem::ToolCall {
                agent,
                call_id,
                tool,
                arguments,
            } => format!(
                "{} tool call {}({}) id={}",
                format!("[{}]", agent).color(self.agent_color).bold(),
                tool.color(self.tool_color),
                if arguments.is_null() { String::new() } else { arguments.to_string() },
                call_id
            ),
            RunItem::ToolCallOutput {
                agent,
                call_id,
                output,
                is_error,
            } => {
                let label = if *is_error { "tool error" } else { "tool output" };
                format!(
                    "{} {} id={}: {}",
                    format!("[{}]", agent).color(self.agent_color).bold(),
                    label,
                    call_id,
                    output.replace('\n', " | ")
                )
            }
            RunItem::HandoffCall {
                agent,
                call_id,
                tool,
            } => format!(
                "{} handoff call {} id={}",
                format!("[{}]", agent).color(self.agent_color).bold(),
                tool.color(self.handoff_color),
                call_id
            ),
            RunItem::HandoffOutput { source, target, .. } => format!(
                "{} handoff {} -> {}",
                format!("[{}]", source).color(self.agent_color).bold(),
                source,
                target.color(self.handoff_color).bold()
            ),
        }
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::llm::Usage;
    use serde_json::json;
    use std::sync::Arc;

    fn render(result: &RunResult) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        Report::new().write(&mut buf, result).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_report_layout() {
        let result = RunResult {
            final_output: "Photosynthesis is how plants make food.".into(),
            last_agent: Arc::new(Agent::new("PlantAgent", "...")),
            new_items: vec![
                RunItem::ToolCall {
                    agent: "NewsLocationAgent".into(),
                    call_id: "c1".into(),
                    tool: "get_current_location".into(),
                    arguments: json!({}),
                },
                RunItem::ToolCallOutput {
                    agent: "NewsLocationAgent".into(),
                    call_id: "c1".into(),
                    output: "Your current location is:\nCity: Lahore".into(),
                    is_error: false,
                },
                RunItem::HandoffOutput {
                    call_id: "h1".into(),
                    source: "NewsLocationAgent".into(),
                    target: "PlantAgent".into(),
                },
            ],
            usage: Usage::default(),
        };

        let report = render(&result);
        let lines: Vec<_> = report.lines().collect();

        assert_eq!(lines[0], "=".repeat(50));
        assert_eq!(lines[1], "Result:  PlantAgent");
        assert_eq!(
            lines[2],
            "  1. [NewsLocationAgent] tool call get_current_location({}) id=c1"
        );
        assert_eq!(
            lines[3],
            "  2. [NewsLocationAgent] tool output id=c1: Your current location is: | City: Lahore"
        );
        assert_eq!(
            lines[4],
            "  3. [NewsLocationAgent] handoff NewsLocationAgent -> PlantAgent"
        );
        assert_eq!(lines[5], "Result:  Photosynthesis is how plants make food.");
        assert_eq!(lines.len(), 6);
    }
}
