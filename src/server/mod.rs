//! HTTP Server Module
//!
//! - `POST /tts-stream`: synthesize speech with backend fallback
//! - `POST /detect-language`: identify the language of a text
//! - `GET /languages`: list supported languages and their backends
//! - `GET /health`: service status

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server_core;
pub mod types;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server_core::{apply_layers, create_router, ServerState, TtsServer};
pub use types::*;
