//! HTTP surface of the custom handler.
//!
//! The Functions host forwards the trigger's original request path, so the
//! function is mounted at `/{route_prefix}/{name}` exactly as the public route
//! reads. Only GET and POST are bound: any other method gets a 405 from the
//! method router and never reaches the handler.

pub mod endpoint;
pub mod health;
pub mod invocation_id;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{config::FunctionConfig, invocation_log::InvocationLog};
use endpoint::Endpoint;

/// Build the handler's axum router.
pub fn router<L: InvocationLog>(endpoint: Arc<Endpoint<L>>, function: &FunctionConfig) -> Router {
    let trace_layer = tower_http::trace::TraceLayer::new_for_http()
        .make_span_with(tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO))
        .on_response(tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO));

    Router::new()
        .route(
            &function.route(),
            get(endpoint::handle::<L>).post(endpoint::handle::<L>),
        )
        .route("/healthz", get(health::healthz))
        .with_state(endpoint)
        .layer(axum::middleware::from_fn(invocation_id::invocation_id_middleware))
        .layer(trace_layer)
}
