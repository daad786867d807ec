//! Request logging
//!
//! One line per request with method, path, status and latency; WARN once the
//! latency reaches the configured slow-request threshold.

use std::time::Instant;

use axum::{extract::{Request, State}, middleware::Next, response::Response};
use tracing::{info, warn};

use crate::routes::auth::ServerState;

pub async fn track_latency(State(state): State<ServerState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    let resp = next.run(req).await;

    let elapsed = start.elapsed();
    let status = resp.status().as_u16();
    let latency_ms = elapsed.as_millis() as u64;
    if elapsed >= state.slow_request {
        warn!(%method, %path, status, latency_ms, threshold_ms = state.slow_request.as_millis() as u64, "slow request");
    } else {
        info!(%method, %path, status, latency_ms, "request completed");
    }
    resp
}
