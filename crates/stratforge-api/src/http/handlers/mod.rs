//! HTTP request handlers.

pub mod generate;
pub mod session;
pub mod wizard;

use uuid::Uuid;

use stratforge_types::wizard::WizardState;

use crate::http::error::AppError;
use crate::state::AppState;

/// Parse a session id path segment.
pub(crate) fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("Invalid session_id format".to_string()))
}

/// Clone the current state snapshot for a session.
///
/// Handlers that need to await (generation) must work on a snapshot; a
/// DashMap guard held across an await point can deadlock the map.
pub(crate) fn session_snapshot(state: &AppState, id: Uuid) -> Result<WizardState, AppError> {
    state
        .sessions
        .get(&id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::SessionNotFound(id.to_string()))
}
