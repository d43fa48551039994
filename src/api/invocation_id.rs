//! Per-invocation correlation id.
//!
//! Every forwarded request gets an id, taken from the caller's `x-request-id`
//! when present and non-empty, otherwise a fresh UUID v4. The id is stored as
//! an axum extension and attached to a span around the handler so the
//! invocation log line carries it. It is never written to the response, which
//! must not vary with the request.

use axum::{
    extract::Request,
    http::HeaderName,
    middleware::Next,
    response::Response,
};
use tracing::Instrument as _;
use uuid::Uuid;

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// The id assigned to the current invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationId(pub String);

/// Apply **inside** the `TraceLayer` so the id span nests under the request span.
pub async fn invocation_id_middleware(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(InvocationId(id.clone()));

    let span = tracing::info_span!("invocation", id = %id);
    next.run(req).instrument(span).await
}
