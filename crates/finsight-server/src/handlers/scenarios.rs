//! Snapshot and scenario handlers

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AppError, AppState};
use finsight_core::{
    build_snapshot, narrative, scenario, ScenarioSimulator, SimulationResult, Snapshot, Summary,
    DEFAULT_PROFILE_ID,
};

use super::parse_request;

/// Period used when the request names none
pub const DEFAULT_PERIOD: &str = "6M";

/// Body shared by the snapshot and simulate endpoints; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioRequest {
    pub period: Option<String>,
    pub question: Option<String>,
    pub profile: Option<String>,
    /// Ask the AI backend for the summary instead of the rule-based one
    pub ai_summary: Option<bool>,
}

impl ScenarioRequest {
    fn period(&self) -> &str {
        self.period.as_deref().unwrap_or(DEFAULT_PERIOD)
    }

    fn question(&self) -> &str {
        self.question.as_deref().unwrap_or_default()
    }

    fn profile(&self) -> &str {
        self.profile.as_deref().unwrap_or(DEFAULT_PROFILE_ID)
    }
}

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub snapshot: Snapshot,
    pub summary: Summary,
}

fn load_snapshot(state: &AppState, req: &ScenarioRequest) -> Result<Snapshot, AppError> {
    let profile = state.profiles.load(req.profile()).map_err(AppError::from_core)?;
    build_snapshot(req.period(), &profile.time_series, &profile.expenses)
        .map_err(AppError::from_core)
}

/// POST /api/snapshot - Snapshot for a period plus its narrative summary
pub async fn snapshot(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SnapshotResponse>, AppError> {
    let req: ScenarioRequest = parse_request(&body)?;
    let snapshot = load_snapshot(&state, &req)?;

    let summary = if req.ai_summary.unwrap_or(false) {
        scenario::summarize_with_ai(state.ai.as_ref(), &snapshot, req.question()).await
    } else {
        narrative::summarize(&snapshot, req.question())
    };

    Ok(Json(SnapshotResponse { snapshot, summary }))
}

/// POST /api/simulate - Answer a scenario question, falling back to a local summary
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SimulationResult>, AppError> {
    let req: ScenarioRequest = parse_request(&body)?;

    // Blank questions never touch the profile data
    if req.question().trim().is_empty() {
        return Ok(Json(scenario::empty_prompt()));
    }

    let snapshot = load_snapshot(&state, &req)?;
    let outcome = ScenarioSimulator::new(state.ai.as_ref())
        .simulate(&snapshot, req.question())
        .await;
    debug!(state = ?outcome.state, period = %snapshot.period, "Scenario simulated");

    Ok(Json(outcome.result))
}
