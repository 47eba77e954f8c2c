//! Scenario completion proxy
//!
//! For dashboards that already hold a snapshot: the client posts the question
//! together with its snapshot and gets the model's answer back. Failures are
//! reported as errors so the client can run its own fallback.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::{AppError, AppState};
use finsight_core::{AIBackend, ClientSnapshot, FlowGrain, ScenarioFacts, SimulationResult};

use super::parse_json_body;

const SIMULATION_FAILED: &str = "Simulation failed";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CompletionRequest {
    /// Time horizon shown to the model; falls back to the snapshot's own period
    pub period: Option<String>,
    pub question: Option<String>,
    pub snapshot: Option<Value>,
}

/// POST /api/scenario-completion
pub async fn scenario_completion(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SimulationResult>, AppError> {
    let Some(ref ai) = state.ai else {
        return Err(AppError::internal("OPENAI_API_KEY not configured"));
    };

    let req: CompletionRequest = parse_json_body(&body)
        .map_err(|e| AppError::internal(SIMULATION_FAILED).with_detail(e.to_string()))?;

    let question = req.question.as_deref().map(str::trim).unwrap_or_default();
    let snapshot = match req.snapshot {
        Some(value) if !value.is_null() => value,
        _ => return Err(AppError::bad_request("Missing question or snapshot")),
    };
    if question.is_empty() {
        return Err(AppError::bad_request("Missing question or snapshot"));
    }

    // Non-object snapshots carry no figures; every field then reads as zero
    let snapshot: ClientSnapshot = serde_json::from_value(snapshot).unwrap_or_default();
    let mut facts = ScenarioFacts::from(&snapshot);
    if let Some(period) = req.period.filter(|p| !p.trim().is_empty()) {
        facts.flow_grain = FlowGrain::for_period(&period);
        facts.period = period;
    }

    match ai.simulate_scenario(&facts, question).await {
        Ok(reply) => Ok(Json(reply.into())),
        Err(e) => {
            warn!(host = ai.host(), error = %e, "Scenario completion failed");
            Err(AppError::internal(SIMULATION_FAILED).with_detail(e.to_string()))
        }
    }
}

/// Any other method on the completion route
pub async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed("Method not allowed")
}
