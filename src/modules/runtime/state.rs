//! Shared runtime application state (HTTP handlers)

use std::sync::Arc;

use crate::gateway::QueryGateway;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<QueryGateway>,
}

impl AppState {
    pub fn new(gateway: Arc<QueryGateway>) -> Self {
        Self { gateway }
    }
}
