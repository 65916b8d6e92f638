//! REST API handlers for strategy generation.
//!
//! Generation is the slow path: the provider call can take tens of
//! seconds, so handlers work on a cloned state snapshot and hold no map
//! guard across the await. A per-session slot in `AppState::generating`
//! rejects concurrent generation for the same session.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stratforge_types::error::GenerationError;
use stratforge_types::strategy::ResearchSummary;

use crate::http::error::AppError;
use crate::http::handlers::{parse_session_id, session_snapshot};
use crate::http::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response DTOs
// ---------------------------------------------------------------------------

/// Request body for research-driven generation.
#[derive(Debug, Deserialize)]
pub struct GenerateFromResearchRequest {
    pub selection: Vec<ResearchSummary>,
}

/// Response carrying the generated strategy document.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub session_id: String,
    pub provider: String,
    pub model: String,
    pub prompt: String,
    pub strategy: String,
}

// ---------------------------------------------------------------------------
// In-flight slot
// ---------------------------------------------------------------------------

/// RAII claim on a session's generation slot. The slot releases when the
/// guard drops, including on provider failure.
struct GenerationSlot<'a> {
    state: &'a AppState,
    session_id: Uuid,
}

impl<'a> GenerationSlot<'a> {
    fn claim(state: &'a AppState, session_id: Uuid) -> Result<Self, AppError> {
        // DashMap entry insert is the atomic claim; a second request for
        // the same session sees the occupied slot.
        if state.generating.insert(session_id, ()).is_some() {
            return Err(AppError::Generation(GenerationError::InFlight));
        }
        Ok(Self { state, session_id })
    }
}

impl Drop for GenerationSlot<'_> {
    fn drop(&mut self) {
        self.state.generating.remove(&self.session_id);
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions/:session_id/generate -- Generate a strategy.
///
/// Compiles the session's current draft into a prompt and submits it to
/// the provider matching the session's model target. Returns 409 when a
/// generation for this session is already running.
pub async fn generate(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_session_id(&session_id)?;
    let snapshot = session_snapshot(&state, id)?;
    let _slot = GenerationSlot::claim(&state, id)?;

    let generator = state
        .create_generator(&snapshot.model_target)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let result = generator.generate(&snapshot).await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let response = GenerateResponse {
        session_id: session_id.clone(),
        provider: generator.provider_name().to_string(),
        model: result.response.model.clone(),
        prompt: result.prompt,
        strategy: result.response.content,
    };

    let resp_json = serde_json::to_value(&response).unwrap();
    let resp = ApiResponse::success(resp_json, request_id, elapsed)
        .with_link("session", &format!("/api/v1/sessions/{session_id}"));

    Ok(Json(resp))
}

/// POST /api/v1/sessions/:session_id/generate-from-research -- Generate
/// from selected research summaries.
///
/// Folds the selected summaries into the research slot of a state
/// snapshot and generates; the stored session is untouched. Rejects an
/// empty selection with 400.
pub async fn generate_from_research(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<GenerateFromResearchRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_session_id(&session_id)?;
    let snapshot = session_snapshot(&state, id)?;
    let _slot = GenerationSlot::claim(&state, id)?;

    let generator = state
        .create_generator(&snapshot.model_target)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let result = generator
        .generate_from_research(&snapshot, &body.selection)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let response = GenerateResponse {
        session_id: session_id.clone(),
        provider: generator.provider_name().to_string(),
        model: result.response.model.clone(),
        prompt: result.prompt,
        strategy: result.response.content,
    };

    let resp_json = serde_json::to_value(&response).unwrap();
    let resp = ApiResponse::success(resp_json, request_id, elapsed)
        .with_link("session", &format!("/api/v1/sessions/{session_id}"));

    Ok(Json(resp))
}
