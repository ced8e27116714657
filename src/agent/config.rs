//! Run Configuration

use std::sync::Arc;

use crate::config::{Settings, DEFAULT_MAX_TURNS};
use crate::llm::LlmProvider;

/// Configuration for one [`Runner::run`](super::Runner::run)
///
/// ```ignore
/// let config = RunConfig::new(llm).with_max_turns(5);
/// ```
#[derive(Clone)]
pub struct RunConfig {
    /// Model provider used for every agent in the run
    pub llm: Arc<dyn LlmProvider>,

    /// Maximum number of model calls before the run gives up
    pub max_turns: usize,
}

impl RunConfig {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            llm,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Build from loaded settings
    pub fn from_settings(llm: Arc<dyn LlmProvider>, settings: &Settings) -> Self {
        Self::new(llm).with_max_turns(settings.max_turns)
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("provider", &self.llm.provider_name())
            .field("model", &self.llm.model())
            .field("max_turns", &self.max_turns)
            .finish()
    }
}
