//! Pluggable AI backend abstraction
//!
//! This module provides a backend-agnostic interface for the language-model
//! features: answering scenario questions and summarizing a fact block.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI operations
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let ai = AIClient::from_env();
//!
//! if let Some(ref client) = ai {
//!     let facts = ScenarioFacts::from_snapshot(&snapshot);
//!     let reply = client.simulate_scenario(&facts, "retire at 60").await?;
//!     println!("{}", reply.heading);
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (openai, mock). Default: openai
//! - `OPENAI_API_KEY`: API key (or `secrets/openai_key.txt`); required for openai
//! - `OPENAI_BASE_URL`: Server URL (default: https://api.openai.com)
//! - `OPENAI_MODEL`: Model name (default: gpt-4o-mini)

mod mock;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use mock::{MockBackend, MockFailure};
pub use openai_compatible::{OpenAICompatibleBackend, DEFAULT_BASE_URL, DEFAULT_MODEL, KEY_FILE};
pub use types::*;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ScenarioFacts;

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Answer a free-text scenario question against the supplied facts
    async fn simulate_scenario(&self, facts: &ScenarioFacts, question: &str)
        -> Result<ScenarioReply>;

    /// Summarize the current position described by the facts
    async fn summarize_facts(&self, facts: &ScenarioFacts) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI-compatible backend (hosted OpenAI, vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing and offline demos
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `openai` (default): needs an API key, see [`OpenAICompatibleBackend::from_env`]
    /// - `mock`: Creates a mock backend
    ///
    /// Returns None when the openai backend has no API key.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "openai".to_string());

        match backend.to_lowercase().as_str() {
            "openai" | "openai_compatible" => {
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to openai");
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
        }
    }

    /// Create an OpenAI-compatible backend directly
    pub fn openai(base_url: &str, model: &str, api_key: &str) -> Self {
        AIClient::OpenAICompatible(OpenAICompatibleBackend::with_api_key(
            base_url, model, api_key,
        ))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn simulate_scenario(
        &self,
        facts: &ScenarioFacts,
        question: &str,
    ) -> Result<ScenarioReply> {
        match self {
            AIClient::OpenAICompatible(b) => b.simulate_scenario(facts, question).await,
            AIClient::Mock(b) => b.simulate_scenario(facts, question).await,
        }
    }

    async fn summarize_facts(&self, facts: &ScenarioFacts) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => b.summarize_facts(facts).await,
            AIClient::Mock(b) => b.summarize_facts(facts).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
