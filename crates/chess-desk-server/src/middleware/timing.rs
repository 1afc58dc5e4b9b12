//! Request timing middleware.
//!
//! Every request is logged with its method, path, status and duration. The
//! proxy endpoint waits on the engine service, so slow requests are logged
//! louder to make a stalled engine visible.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::{Duration, Instant};

/// Requests taking longer than this are logged at warn level.
pub const SLOW_REQUEST: Duration = Duration::from_millis(100);

/// Logs the duration of each request.
///
/// # Example
///
/// ```ignore
/// use axum::{middleware, routing::get, Router};
/// use chess_desk_server::middleware::timing_layer;
///
/// let app = Router::new()
///     .route("/health", get(health))
///     .layer(middleware::from_fn(timing_layer));
/// ```
pub async fn timing_layer(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed = started.elapsed();
    let status = response.status().as_u16();
    let elapsed_ms = elapsed.as_millis() as u64;

    if elapsed > SLOW_REQUEST {
        tracing::warn!(%method, %path, status, elapsed_ms, "Slow request");
    } else {
        tracing::debug!(%method, %path, status, elapsed_ms, "Request completed");
    }

    response
}
