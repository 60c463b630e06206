//! Endpoint listing handler

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// Lists configured endpoint names. URLs and credentials are never exposed.
pub struct EndpointsHandler;

impl EndpointsHandler {
    /// Handle GET /api/endpoints
    pub async fn list(State(state): State<AppState>) -> Json<Value> {
        let names = state.gateway.registry().names().await;
        Json(json!({ "endpoints": names }))
    }
}
