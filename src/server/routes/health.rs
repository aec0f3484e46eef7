//! Health Check Routes

use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use crate::language::supported_codes;
use crate::server::server_core::ServerState;
use crate::server::types::{BackendStatus, HealthResponse};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: crate::SERVICE_NAME.to_string(),
        version: crate::VERSION.to_string(),
        supported_languages: supported_codes().into_iter().map(String::from).collect(),
        backends: BackendStatus {
            native: state.dispatcher.native_available(),
            cloud: state.dispatcher.cloud_enabled(),
            classifier: state.config.classifier.enabled,
        },
        uptime: state.uptime().as_secs(),
    })
}
