//! Mock backend for testing
//!
//! Produces predictable replies built from the supplied facts, or a forced
//! failure. Useful for unit tests and offline demos without an API key.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::format::gbp;
use crate::models::ScenarioFacts;

use super::parsing::{parse_simulation_text, parse_summary_text};
use super::types::ScenarioReply;
use super::AIBackend;

/// Failure a mock backend can be told to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Behave as if the service could not be reached
    Transport,
    /// Answer with a non-2xx status
    Upstream,
    /// Answer 200 with nothing usable in it
    Malformed,
}

/// Mock AI backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Forced failure for every completion call
    pub failure: Option<MockFailure>,
    /// Fixed completion text; when unset the reply is built from the facts
    pub reply: Option<String>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Default::default()
        }
    }

    /// Create a mock that fails every completion with the given failure
    pub fn failing(failure: MockFailure) -> Self {
        Self {
            healthy: failure != MockFailure::Transport,
            failure: Some(failure),
            reply: None,
        }
    }

    /// Create a mock that always answers with this text
    pub fn with_reply(text: impl Into<String>) -> Self {
        Self {
            healthy: true,
            failure: None,
            reply: Some(text.into()),
        }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }

    fn check_failure(&self) -> Result<()> {
        match self.failure {
            None => Ok(()),
            Some(MockFailure::Transport) => Err(Error::Unreachable(self.host().to_string())),
            Some(MockFailure::Upstream) => Err(Error::Upstream {
                status: 503,
                body: "mock upstream failure".to_string(),
            }),
            Some(MockFailure::Malformed) => Err(Error::InvalidData(
                "No response from mock backend".into(),
            )),
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn simulate_scenario(
        &self,
        facts: &ScenarioFacts,
        question: &str,
    ) -> Result<ScenarioReply> {
        self.check_failure()?;

        let text = match self.reply {
            Some(ref reply) => reply.clone(),
            None => {
                let mut text = format!("Mock plan: {}\n", question.trim());
                text.push_str(&format!(
                    "- Over {} you keep about {}/month after expenses.\n",
                    facts.period,
                    gbp(facts.savings_monthly)
                ));
                if let Some(top) = facts.top_expenses.first() {
                    text.push_str(&format!(
                        "- {} is the largest cost at {}/month.\n",
                        top.label,
                        gbp(top.monthly)
                    ));
                }
                text.push_str("- Revisit this plan when your income changes.");
                text
            }
        };

        parse_simulation_text(&text)
    }

    async fn summarize_facts(&self, facts: &ScenarioFacts) -> Result<String> {
        self.check_failure()?;

        let text = match self.reply {
            Some(ref reply) => reply.clone(),
            None => format!(
                "Over {} you earn {}/month and spend {}/month.",
                facts.period,
                gbp(facts.salary_monthly),
                gbp(facts.expenses_monthly)
            ),
        };

        parse_summary_text(&text)
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
