//! Request logging middleware
//!
//! Logs method, path, status and latency of every request, tagged with the
//! `x-request-id` assigned further out. Slow requests are logged as warnings.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// Requests slower than this are logged at `warn`
pub const SLOW_REQUEST_MS: f64 = 1000.0;

/// Request logging middleware
pub async fn log_requests(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let method = req.method().clone();
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    let status = response.status();

    if duration_ms > SLOW_REQUEST_MS {
        warn!(
            request_id = %request_id,
            "Slow request: {} {} took {:.2}ms (status: {})",
            method, path, duration_ms, status
        );
    } else {
        info!(
            request_id = %request_id,
            "Request: {} {} took {:.2}ms (status: {})",
            method, path, duration_ms, status
        );
    }

    response
}
