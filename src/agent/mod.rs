//! Agents, handoffs and the runner that drives them
//!
//! - `Agent` - Immutable bundle of instructions, tools and handoffs
//! - `Handoff` - Transfer of control exposed to the model as a tool
//! - `RunConfig` - Model provider and turn limit for a run
//! - `Runner` - Executes a run and records every step
//! - `RunItem` / `RunResult` - What a run produced

#[allow(clippy::module_inception)]
mod agent;
mod config;
mod handoff;
mod items;
mod runner;

pub use agent::Agent;
pub use config::RunConfig;
pub use handoff::{handoff_tool_name, Handoff};
pub use items::{RunItem, RunResult};
pub use runner::Runner;
