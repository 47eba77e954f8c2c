//! Scenario answers
//!
//! The local fallback generator produces a templated answer from a snapshot.
//! [`ScenarioSimulator`] drives a single request: an empty question is
//! answered locally, anything else is tried against the AI backend first and
//! falls back to the template when that fails.

use tracing::{debug, warn};

use crate::ai::{AIBackend, AIClient, ScenarioReply};
use crate::format::{gbp, percent};
use crate::models::{ScenarioFacts, SimulationResult, Snapshot, Summary};
use crate::narrative;

/// Prompt shown when the question is blank
pub const EMPTY_PROMPT_LINE: &str = "Type a scenario question first (e.g. 'retire at 65').";

/// Last line of every local fallback answer
pub const FALLBACK_NOTICE: &str =
    "AI scenario service is unavailable right now; showing a summary of your current position.";

/// Heading of a transport failure result
pub const ERROR_HEADING: &str = "Error";

/// Body of a transport failure result
pub const ERROR_LINE: &str = "Failed to run simulation. Please try again.";

/// Headline of an AI-written summary
pub const AI_SUMMARY_HEADLINE: &str = "Financial Insight Summary";

/// Disclaimer attached to an AI-written summary
pub const AI_SUMMARY_NOTE: &str = "Generated from provided facts. Not advice.";

/// Local answer to a scenario question. Never fails.
pub fn simulate(snapshot: &Snapshot, question: &str) -> SimulationResult {
    let q = question.trim();
    if q.is_empty() {
        return empty_prompt();
    }

    SimulationResult {
        heading: format!("Scenario: {}", q),
        lines: vec![
            format!("Period: {}", snapshot.period),
            format!(
                "Income {}/month | Expenses {}/month | Savings {}/month",
                gbp(snapshot.salary_monthly),
                gbp(snapshot.monthly_expense_total),
                gbp(snapshot.savings_est_monthly)
            ),
            format!(
                "Resilience {} | Liquidity {}",
                percent(snapshot.resilience),
                percent(snapshot.liquidity)
            ),
            FALLBACK_NOTICE.to_string(),
        ],
        enabled: true,
    }
}

/// Answer for a blank question
pub fn empty_prompt() -> SimulationResult {
    SimulationResult {
        heading: String::new(),
        lines: vec![EMPTY_PROMPT_LINE.to_string()],
        enabled: true,
    }
}

/// Hard failure: the scenario service could not be reached at all
pub fn transport_error() -> SimulationResult {
    SimulationResult {
        heading: ERROR_HEADING.to_string(),
        lines: vec![ERROR_LINE.to_string()],
        enabled: false,
    }
}

impl From<ScenarioReply> for SimulationResult {
    fn from(reply: ScenarioReply) -> Self {
        Self {
            heading: reply.heading,
            lines: reply.lines,
            enabled: true,
        }
    }
}

/// Where a simulation answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    /// Blank question, answered without calling a backend
    EmptyPrompt,
    /// The backend answered and the reply parsed
    RemoteSuccess,
    /// No backend, or the backend answered with something unusable
    LocalFallback,
    /// The backend could not be reached
    TransportError,
}

/// Result of one simulation request
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub state: SimulationState,
    pub result: SimulationResult,
}

impl SimulationOutcome {
    fn new(state: SimulationState, result: SimulationResult) -> Self {
        Self { state, result }
    }
}

/// Runs one scenario request against an optional AI backend
///
/// One attempt per request; no retries.
pub struct ScenarioSimulator<'a> {
    ai: Option<&'a AIClient>,
}

impl<'a> ScenarioSimulator<'a> {
    pub fn new(ai: Option<&'a AIClient>) -> Self {
        Self { ai }
    }

    pub async fn simulate(&self, snapshot: &Snapshot, question: &str) -> SimulationOutcome {
        let q = question.trim();
        if q.is_empty() {
            return SimulationOutcome::new(SimulationState::EmptyPrompt, empty_prompt());
        }

        let Some(ai) = self.ai else {
            debug!("No AI backend configured, using local scenario fallback");
            return SimulationOutcome::new(SimulationState::LocalFallback, simulate(snapshot, q));
        };

        let facts = ScenarioFacts::from_snapshot(snapshot);
        match ai.simulate_scenario(&facts, q).await {
            Ok(reply) => SimulationOutcome::new(SimulationState::RemoteSuccess, reply.into()),
            Err(e) if e.is_transport() => {
                warn!(host = ai.host(), error = %e, "AI scenario service unreachable");
                SimulationOutcome::new(SimulationState::TransportError, transport_error())
            }
            Err(e) => {
                warn!(model = ai.model(), error = %e, "AI scenario failed, using local fallback");
                SimulationOutcome::new(SimulationState::LocalFallback, simulate(snapshot, q))
            }
        }
    }
}

/// Summary written by the AI backend when one is available, else the rule-based one
pub async fn summarize_with_ai(
    ai: Option<&AIClient>,
    snapshot: &Snapshot,
    question: &str,
) -> Summary {
    let Some(ai) = ai else {
        return narrative::summarize(snapshot, question);
    };

    let facts = ScenarioFacts::from_snapshot(snapshot);
    match ai.summarize_facts(&facts).await {
        Ok(text) => Summary {
            headline: AI_SUMMARY_HEADLINE.to_string(),
            bullets: vec![text],
            note: AI_SUMMARY_NOTE.to_string(),
        },
        Err(e) => {
            warn!(error = %e, "AI summary failed, using rule-based summary");
            narrative::summarize(snapshot, question)
        }
    }
}
