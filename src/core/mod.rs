//! Core types shared across the crate
//!
//! - `FrameworkError` / `FrameworkResult` - Error types

pub mod error;

pub use error::{FrameworkError, FrameworkResult};
