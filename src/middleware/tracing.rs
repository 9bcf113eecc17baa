use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info_span, Instrument};

/// Request-scoped tracing middleware: wraps each request in a span carrying
/// method, route, and a fresh request id, and logs status and latency on
/// completion.
pub async fn request_tracing(
    matched_path: MatchedPath,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let route = matched_path.as_str().to_string();
    let start_time = Instant::now();

    let span = info_span!(
        "http_request",
        method = %method,
        uri = %uri,
        route = %route,
        request_id = %uuid::Uuid::now_v7(),
    );

    let response = next.run(request).instrument(span).await;

    let latency = start_time.elapsed();
    let status = response.status().as_u16();
    if status >= 500 {
        tracing::error!(%method, %route, status, latency_ms = latency.as_millis() as u64, "request failed");
    } else {
        tracing::info!(%method, %route, status, latency_ms = latency.as_millis() as u64, "request completed");
    }

    response
}
