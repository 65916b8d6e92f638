//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Session lifecycle
        .route("/sessions", post(handlers::session::create_session))
        .route("/sessions/{id}", get(handlers::session::get_session))
        .route("/sessions/{id}", delete(handlers::session::delete_session))
        .route("/sessions/{id}/reset", post(handlers::session::reset_session))
        // Navigation
        .route("/sessions/{id}/advance", post(handlers::wizard::advance))
        .route("/sessions/{id}/back", post(handlers::wizard::back))
        .route("/sessions/{id}/skip", post(handlers::wizard::skip))
        .route("/sessions/{id}/unskip", post(handlers::wizard::unskip))
        // Stage data and settings
        .route(
            "/sessions/{id}/stages/{stage_key}",
            put(handlers::wizard::set_stage_data),
        )
        .route("/sessions/{id}/notes", put(handlers::wizard::set_notes))
        .route("/sessions/{id}/target", put(handlers::wizard::set_target))
        // Prompt preview
        .route("/sessions/{id}/prompt", get(handlers::wizard::preview_prompt))
        // Generation
        .route("/sessions/{id}/generate", post(handlers::generate::generate))
        .route(
            "/sessions/{id}/generate-from-research",
            post(handlers::generate::generate_from_research),
        )
        // Template catalog
        .route("/catalog/templates", get(handlers::wizard::list_templates));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
