//! Framework error types

use thiserror::Error;

/// Errors that can occur while configuring or running an agent
#[derive(Error, Debug)]
pub enum FrameworkError {
    /// A required credential is missing from the environment
    #[error("{0} is not set. Add it to the environment or a .env file.")]
    MissingCredential(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The run did not produce a final answer within the turn limit
    #[error("Max turns ({0}) exceeded")]
    MaxTurnsExceeded(usize),

    /// The model asked for something the current agent cannot do
    #[error("Model behavior error: {0}")]
    ModelBehavior(String),

    /// The LLM provider failed
    #[error("LLM provider error: {0:#}")]
    Provider(anyhow::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FrameworkError {
    /// Create a model behavior error
    pub fn model_behavior(msg: impl Into<String>) -> Self {
        FrameworkError::ModelBehavior(msg.into())
    }
}

/// Result type alias for framework operations
pub type FrameworkResult<T> = Result<T, FrameworkError>;
