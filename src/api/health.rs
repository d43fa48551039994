//! Liveness probe.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// `GET /healthz` — always returns 200 OK with `{"status": "ok"}`.
///
/// Not part of the function surface: the Functions host never forwards to it.
/// It backs `welcome-fn --healthcheck` for container probes.
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
