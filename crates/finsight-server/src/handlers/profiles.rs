//! Profile listing handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppError, AppState};
use finsight_core::ProfileInfo;

#[derive(Debug, Serialize)]
pub struct ProfilesResponse {
    pub profiles: Vec<ProfileInfo>,
}

/// GET /api/profiles - List available profiles, sorted by id
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProfilesResponse>, AppError> {
    let profiles = state.profiles.list()?;
    Ok(Json(ProfilesResponse { profiles }))
}
