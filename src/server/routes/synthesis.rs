//! Synthesis Routes

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use std::sync::Arc;
use tracing::info;

use crate::server::error::ApiError;
use crate::server::server_core::ServerState;
use crate::server::types::TtsRequest;

/// Header naming the backend that produced the audio
pub const BACKEND_HEADER: &str = "x-tts-backend";

/// Synthesize speech and return the audio bytes
pub async fn tts_stream(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;

    info!(
        lang_code = request.lang_code(),
        chars = request.text().chars().count(),
        "TTS request"
    );

    let audio = state
        .dispatcher
        .synthesize(request.text(), request.lang_code())
        .await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, audio.mime.as_str())
        .header(header::CONTENT_LENGTH, audio.len())
        .header(BACKEND_HEADER, audio.backend.as_str())
        .body(Body::from(audio.bytes))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}
