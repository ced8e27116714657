pub mod config;
pub mod core;
pub mod llm;
pub mod logging;
pub mod tools;

// Agents, handoffs and the runner
pub mod agent;

// Report rendering
pub mod cli;

// The agents and prompt this program runs
pub mod briefing;

#[cfg(test)]
pub(crate) mod testing;
