//! Scenario simulation command

use std::path::Path;

use anyhow::Result;
use finsight_core::{
    scenario, AIBackend, AIClient, ScenarioSimulator, SimulationResult, SimulationState,
};

use super::load_snapshot;

pub async fn cmd_simulate(
    data_dir: &Path,
    profile: &str,
    period: &str,
    question: &str,
    json: bool,
) -> Result<()> {
    // Blank questions are answered without loading any data
    let result = if question.trim().is_empty() {
        scenario::empty_prompt()
    } else {
        let snapshot = load_snapshot(data_dir, profile, period)?;
        let ai = AIClient::from_env();
        if let Some(ref client) = ai {
            tracing::debug!(host = client.host(), model = client.model(), "Using AI backend");
        }

        let outcome = ScenarioSimulator::new(ai.as_ref())
            .simulate(&snapshot, question)
            .await;
        if outcome.state == SimulationState::TransportError {
            eprintln!("⚠️  AI scenario service could not be reached");
        }
        outcome.result
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_simulation(&result));
    }

    Ok(())
}

/// Human-readable simulation answer
pub fn render_simulation(result: &SimulationResult) -> String {
    let mut out = String::new();
    if !result.heading.is_empty() {
        out.push_str(&format!("🔮 {}\n", result.heading));
    }
    for line in &result.lines {
        out.push_str(&format!("   • {}\n", line));
    }
    out
}
