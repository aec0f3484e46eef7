//! TTS Server Core
//!
//! Shared state, router construction and the listener loop.

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::core::error::Result;
use crate::detection::LanguageIdentifier;
use crate::language::validate_profiles;
use crate::server::config::ServerConfig;
use crate::server::error::ApiError;
use crate::server::middleware::log_requests;
use crate::server::routes;
use crate::synthesis::{
    CloudTtsBackend, GoogleTranslateTts, NativeVoiceBackend, PiperBackend, SynthesisDispatcher,
};

/// Server state shared across handlers
pub struct ServerState {
    /// Server configuration
    pub config: ServerConfig,
    pub dispatcher: SynthesisDispatcher,
    pub identifier: LanguageIdentifier,
    /// Start time for uptime calculation
    pub start_time: Instant,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        dispatcher: SynthesisDispatcher,
        identifier: LanguageIdentifier,
    ) -> Self {
        Self {
            config,
            dispatcher,
            identifier,
            start_time: Instant::now(),
        }
    }

    /// Build the backends described by `config`
    pub fn from_config(config: ServerConfig) -> Result<Self> {
        validate_profiles()?;
        config.validate()?;

        let native: Option<Arc<dyn NativeVoiceBackend>> = if config.native.enabled {
            Some(Arc::new(PiperBackend::new(config.native.clone())))
        } else {
            info!("Native voice backend disabled by configuration");
            None
        };

        let cloud: Option<Arc<dyn CloudTtsBackend>> = if config.cloud.enabled {
            info!(base_url = %config.cloud.base_url, "Cloud TTS enabled");
            Some(Arc::new(GoogleTranslateTts::new(config.cloud.clone())?))
        } else {
            info!("Cloud TTS disabled by configuration");
            None
        };

        let identifier = LanguageIdentifier::from_config(&config.classifier);
        Ok(Self::new(config, SynthesisDispatcher::new(native, cloud), identifier))
    }

    /// Get server uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Create the router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    let router = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/tts-stream", post(routes::synthesis::tts_stream))
        .route("/detect-language", post(routes::detection::detect_language))
        .route("/languages", get(routes::languages::list_languages))
        .with_state(state);

    apply_layers(router)
}

/// Wrap a router in the service's middleware stack.
///
/// Outermost first: CORS, request-id assignment, HTTP tracing, request-id
/// propagation, request logging, panic recovery.
pub fn apply_layers(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any);

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(log_requests))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "Handler panicked");

    ApiError::internal("Internal server error").into_response()
}

/// TTS Server
pub struct TtsServer {
    config: ServerConfig,
}

impl TtsServer {
    /// Create new TTS server
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Run the server until Ctrl+C or SIGTERM
    pub async fn run(self) -> Result<()> {
        let addr = self.config.bind_addr();
        let state = Arc::new(ServerState::from_config(self.config)?);

        info!(
            native = state.dispatcher.native_available(),
            cloud = state.dispatcher.cloud_enabled(),
            classifier = state.config.classifier.enabled,
            "Backends configured"
        );

        let router = create_router(state);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Starting TTS server on http://{}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
