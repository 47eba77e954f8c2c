//! AI backend response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::{Deserialize, Serialize};

/// Parsed scenario completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReply {
    /// Short heading (first non-blank line of the completion)
    pub heading: String,
    /// Guidance lines, never empty
    pub lines: Vec<String>,
}
