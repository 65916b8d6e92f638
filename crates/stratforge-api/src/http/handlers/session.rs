//! REST API handlers for wizard session lifecycle.
//!
//! Provides endpoints to create, inspect, reset, and delete wizard
//! sessions. Sessions live in the in-memory session map on `AppState`;
//! each response carries the standard `ApiResponse` envelope.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stratforge_core::wizard::stages::{stage_at, STAGE_COUNT, STAGES};
use stratforge_core::wizard::state::{new_wizard_state, WizardStateExt};
use stratforge_types::wizard::{ModelTarget, WizardState};

use crate::http::error::AppError;
use crate::http::handlers::parse_session_id;
use crate::http::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response DTOs
// ---------------------------------------------------------------------------

/// Request body for creating a new wizard session.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Target model family for prompt compilation. Defaults to the
    /// configured `default_target` when omitted.
    pub model_target: Option<ModelTarget>,
}

/// Snapshot of a wizard session for the client.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub current_index: usize,
    pub stage_count: usize,
    pub current_stage: String,
    pub current_stage_title: String,
    pub skipped: Vec<usize>,
    pub filled_stages: Vec<String>,
    pub model_target: ModelTarget,
    pub has_custom_notes: bool,
    pub created_at: String,
}

impl SessionView {
    pub fn from_state(state: &WizardState) -> Self {
        let current = stage_at(state.current_index);
        let filled_stages = STAGES
            .iter()
            .filter(|s| state.has_stage_data(s.key))
            .map(|s| s.key.as_str().to_string())
            .collect();

        Self {
            session_id: state.session_id.to_string(),
            current_index: state.current_index,
            stage_count: STAGE_COUNT,
            current_stage: current.map(|s| s.key.as_str()).unwrap_or("").to_string(),
            current_stage_title: current.map(|s| s.section_title).unwrap_or("").to_string(),
            skipped: state.skipped.iter().copied().collect(),
            filled_stages,
            model_target: state.model_target.clone(),
            has_custom_notes: state.custom_notes.is_some(),
            created_at: state.created_at.to_rfc3339(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions -- Create a new wizard session.
///
/// Starts a session at the first stage with an empty draft. The model
/// target comes from the request body or falls back to the configured
/// default.
pub async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let target = body
        .and_then(|Json(b)| b.model_target)
        .unwrap_or_else(|| state.config.default_target.clone());

    let session_id = Uuid::now_v7();
    let wizard = new_wizard_state(session_id, target);
    let view = SessionView::from_state(&wizard);
    state.sessions.insert(session_id, wizard);

    tracing::info!(session_id = %session_id, "Created wizard session");

    let elapsed = start.elapsed().as_millis() as u64;

    let resp_json = serde_json::to_value(&view).unwrap();
    let resp = ApiResponse::success(resp_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{session_id}"))
        .with_link("advance", &format!("/api/v1/sessions/{session_id}/advance"));

    Ok(Json(resp))
}

/// GET /api/v1/sessions/:session_id -- Get session state.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_session_id(&session_id)?;
    let view = state
        .sessions
        .get(&id)
        .map(|entry| SessionView::from_state(&entry))
        .ok_or_else(|| AppError::SessionNotFound(session_id.clone()))?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp_json = serde_json::to_value(&view).unwrap();
    let resp = ApiResponse::success(resp_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{session_id}"));

    Ok(Json(resp))
}

/// POST /api/v1/sessions/:session_id/reset -- Reset a session.
///
/// Clears all stage data, skips, notes, and position, and returns the
/// model target to the default. The session id and creation time survive
/// the reset.
pub async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_session_id(&session_id)?;
    let view = {
        let mut entry = state
            .sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::SessionNotFound(session_id.clone()))?;
        entry.reset();
        SessionView::from_state(&entry)
    };

    tracing::info!(session_id = %session_id, "Reset wizard session");

    let elapsed = start.elapsed().as_millis() as u64;

    let resp_json = serde_json::to_value(&view).unwrap();
    let resp = ApiResponse::success(resp_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{session_id}"));

    Ok(Json(resp))
}

/// DELETE /api/v1/sessions/:session_id -- Delete a session.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_session_id(&session_id)?;
    if state.sessions.remove(&id).is_none() {
        return Err(AppError::SessionNotFound(session_id));
    }

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({"deleted": true, "session_id": id.to_string()}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stratforge_types::wizard::StageKey;

    #[test]
    fn session_view_reports_position_and_filled_stages() {
        let mut wizard = new_wizard_state(Uuid::now_v7(), ModelTarget::Gpt);
        wizard
            .set_stage_data(StageKey::AssetSelection, json!({"symbol": "SOL"}))
            .unwrap();
        wizard.advance().unwrap();
        wizard.skip(wizard.current_index).unwrap();

        let view = SessionView::from_state(&wizard);
        assert_eq!(view.stage_count, STAGE_COUNT);
        assert_eq!(view.current_index, 2);
        assert_eq!(view.current_stage, "sentiment");
        assert_eq!(view.skipped, vec![1]);
        assert_eq!(view.filled_stages, vec!["asset-selection".to_string()]);
        assert_eq!(view.model_target, ModelTarget::Gpt);
        assert!(!view.has_custom_notes);
    }
}
