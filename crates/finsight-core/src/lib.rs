//! Finsight Core Library
//!
//! Shared functionality for the Finsight financial wellbeing dashboard:
//! - Snapshot derivation from per-profile time series
//! - Rule-based narrative summaries
//! - Scenario answers with a local fallback
//! - Pluggable AI backends (OpenAI-compatible, mock)
//! - Prompt library for customizable AI prompts
//! - Profile store over JSON data files

pub mod ai;
pub mod error;
pub mod format;
pub mod models;
pub mod narrative;
pub mod profiles;
pub mod prompts;
pub mod scenario;
pub mod snapshot;

/// Test utilities including mock OpenAI-compatible server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, MockBackend, MockFailure, OpenAICompatibleBackend, ScenarioReply};
pub use error::{Error, Result};
pub use models::{
    ClientSnapshot, ExpenseCategory, ExpenseConfig, ExpenseShare, FlowGrain, FlowSeries, Metrics, Profile,
    ProfileInfo, ScenarioFacts, SimulationResult, Snapshot, Summary, TimeSeries, TimeSeriesBlock,
};
pub use profiles::{ProfileStore, DEFAULT_PROFILE_ID};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use scenario::{ScenarioSimulator, SimulationOutcome, SimulationState};
pub use snapshot::build_snapshot;
