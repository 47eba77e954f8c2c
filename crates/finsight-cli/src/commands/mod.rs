//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Profile listing and shared utilities (load_snapshot)
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command
//! - `simulate` - Scenario question command
//! - `snapshot` - Period snapshot and summary command

pub mod core;
pub mod prompts;
pub mod serve;
pub mod simulate;
pub mod snapshot;

// Re-export command functions for main.rs
pub use core::*;
pub use prompts::*;
pub use serve::*;
pub use simulate::*;
pub use snapshot::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
