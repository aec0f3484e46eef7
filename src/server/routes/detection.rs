//! Language Detection Routes

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::debug;

use crate::detection::DetectionResult;
use crate::server::server_core::ServerState;
use crate::server::types::DetectRequest;

/// Detect the language of a text.
///
/// Always answers 200; a body that is not a JSON object with a string
/// `text` is treated as empty text.
pub async fn detect_language(State(state): State<Arc<ServerState>>, body: Bytes) -> Json<DetectionResult> {
    let text = match serde_json::from_slice::<DetectRequest>(&body) {
        Ok(request) => request.text.unwrap_or_default(),
        Err(e) => {
            debug!(error = %e, "Unreadable detection body, treating as empty text");
            String::new()
        }
    };

    Json(state.identifier.detect_language(&text).await)
}
