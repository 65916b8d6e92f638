//! REST API handlers for the stage-by-stage wizard flow.
//!
//! Covers navigation (advance, back), skip management, stage data
//! submission, custom notes, model target selection, prompt preview,
//! and the built-in strategy template catalog.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stratforge_core::wizard::catalog::template_catalog;
use stratforge_core::wizard::compiler::compile;
use stratforge_core::wizard::state::WizardStateExt;
use stratforge_types::error::WizardError;
use stratforge_types::wizard::{ModelTarget, StageKey};

use crate::http::error::AppError;
use crate::http::handlers::{parse_session_id, session_snapshot};
use crate::http::handlers::session::SessionView;
use crate::http::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response DTOs
// ---------------------------------------------------------------------------

/// Request body for skip and unskip. Skip defaults to the current stage
/// when no index is given; unskip requires one.
#[derive(Debug, Default, Deserialize)]
pub struct SkipRequest {
    pub stage_index: Option<usize>,
}

/// Request body for setting custom notes. `null` or a blank string
/// clears any stored notes.
#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    pub notes: Option<String>,
}

/// Request body for changing the model target.
#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    pub model_target: ModelTarget,
}

/// Response for a compiled prompt preview.
#[derive(Debug, Serialize)]
pub struct PromptPreview {
    pub model_target: ModelTarget,
    pub prompt: String,
    pub char_count: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mutate a session in place and return the refreshed view.
fn with_session<F>(
    state: &AppState,
    session_id: &str,
    f: F,
) -> Result<SessionView, AppError>
where
    F: FnOnce(&mut stratforge_types::wizard::WizardState) -> Result<(), WizardError>,
{
    let id = parse_session_id(session_id)?;
    let mut entry = state
        .sessions
        .get_mut(&id)
        .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))?;
    f(&mut entry)?;
    Ok(SessionView::from_state(&entry))
}

fn envelope(
    view: SessionView,
    request_id: String,
    start: Instant,
    session_id: &str,
) -> Json<ApiResponse<serde_json::Value>> {
    let elapsed = start.elapsed().as_millis() as u64;
    let resp_json = serde_json::to_value(&view).unwrap();
    Json(
        ApiResponse::success(resp_json, request_id, elapsed)
            .with_link("self", &format!("/api/v1/sessions/{session_id}")),
    )
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions/:session_id/advance -- Move to the next stage.
///
/// Fails with 409 at the last stage; the session position is unchanged
/// on failure.
pub async fn advance(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let view = with_session(&state, &session_id, |w| w.advance())?;
    Ok(envelope(view, request_id, start, &session_id))
}

/// POST /api/v1/sessions/:session_id/back -- Move to the previous stage.
pub async fn back(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let view = with_session(&state, &session_id, |w| w.go_back())?;
    Ok(envelope(view, request_id, start, &session_id))
}

/// POST /api/v1/sessions/:session_id/skip -- Skip a stage.
///
/// Marks the stage (current stage by default) as skipped and advances.
/// Skipping the last stage records the mark even though the advance
/// cannot move further; that partial outcome still reports the
/// navigation failure.
pub async fn skip(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Option<Json<SkipRequest>>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let requested = body.and_then(|Json(b)| b.stage_index);
    let view = with_session(&state, &session_id, |w| {
        let index = requested.unwrap_or(w.current_index);
        w.skip(index)
    })?;
    Ok(envelope(view, request_id, start, &session_id))
}

/// POST /api/v1/sessions/:session_id/unskip -- Clear a skip mark.
///
/// Restores the stage for compilation without moving the session
/// position or touching stored stage data.
pub async fn unskip(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<SkipRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let index = body
        .stage_index
        .ok_or_else(|| AppError::Validation("stage_index is required".to_string()))?;
    let view = with_session(&state, &session_id, |w| w.unskip(index))?;
    Ok(envelope(view, request_id, start, &session_id))
}

// ---------------------------------------------------------------------------
// Stage data and settings
// ---------------------------------------------------------------------------

/// PUT /api/v1/sessions/:session_id/stages/:stage_key -- Submit stage data.
///
/// The stage key is the kebab-case stage identifier (e.g.
/// `asset-selection`). The body must deserialize to that stage's data
/// type; composite stages (risk, swap) merge field-by-field over any
/// previously stored values.
pub async fn set_stage_data(
    State(state): State<AppState>,
    Path((session_id, stage_key)): Path<(String, String)>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let key: StageKey = stage_key
        .parse()
        .map_err(|_| AppError::Wizard(WizardError::UnknownStage(stage_key.clone())))?;

    let view = with_session(&state, &session_id, |w| w.set_stage_data(key, body))?;
    Ok(envelope(view, request_id, start, &session_id))
}

/// PUT /api/v1/sessions/:session_id/notes -- Set or clear custom notes.
pub async fn set_notes(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<NotesRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let notes = body.notes.filter(|n| !n.trim().is_empty());
    let view = with_session(&state, &session_id, |w| {
        w.set_custom_notes(notes);
        Ok(())
    })?;
    Ok(envelope(view, request_id, start, &session_id))
}

/// PUT /api/v1/sessions/:session_id/target -- Change the model target.
pub async fn set_target(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<TargetRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let view = with_session(&state, &session_id, |w| {
        w.set_model_target(body.model_target);
        Ok(())
    })?;
    Ok(envelope(view, request_id, start, &session_id))
}

// ---------------------------------------------------------------------------
// Prompt preview and catalog
// ---------------------------------------------------------------------------

/// GET /api/v1/sessions/:session_id/prompt -- Compile the prompt.
///
/// Pure read: compiles the session's current draft for its model target
/// without mutating anything.
pub async fn preview_prompt(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_session_id(&session_id)?;
    let snapshot = session_snapshot(&state, id)?;
    let prompt = compile(&snapshot, &snapshot.model_target);

    let preview = PromptPreview {
        model_target: snapshot.model_target.clone(),
        char_count: prompt.chars().count(),
        prompt,
    };

    let elapsed = start.elapsed().as_millis() as u64;

    let resp_json = serde_json::to_value(&preview).unwrap();
    let resp = ApiResponse::success(resp_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{session_id}/prompt"))
        .with_link("generate", &format!("/api/v1/sessions/{session_id}/generate"));

    Ok(Json(resp))
}

/// GET /api/v1/catalog/templates -- List built-in strategy templates.
pub async fn list_templates(
    State(_state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let templates: Vec<serde_json::Value> = template_catalog()
        .iter()
        .map(|t| serde_json::to_value(t).unwrap())
        .collect();

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(templates, request_id, elapsed)
        .with_link("self", "/api/v1/catalog/templates");

    Ok(Json(resp))
}
