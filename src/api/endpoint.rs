//! The `Endpoint` HTTP trigger.
//!
//! Answers every request it is routed with the same plain-text greeting.
//! Nothing from the request is read: method filtering happens in the router,
//! and headers and body are ignored.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::invocation_log::InvocationLog;

pub const WELCOME_MESSAGE: &str = "Welcome to Azure Functions!";
pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

const PROCESSED: &str = "HTTP trigger function processed a request.";

/// A function instance bound to its name and log sink.
pub struct Endpoint<L> {
    name: String,
    log: L,
}

impl<L: InvocationLog> Endpoint<L> {
    pub fn new(name: impl Into<String>, log: L) -> Self {
        Self {
            name: name.into(),
            log,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub(crate) fn log(&self) -> &L {
        &self.log
    }

    /// Run one invocation: log it, then build the greeting.
    pub fn invoke(&self) -> Response {
        self.log.info(&self.name, PROCESSED);
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, CONTENT_TYPE)],
            WELCOME_MESSAGE,
        )
            .into_response()
    }
}

/// `GET|POST /api/{name}`
pub async fn handle<L: InvocationLog>(State(endpoint): State<Arc<Endpoint<L>>>) -> Response {
    endpoint.invoke()
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;
    use crate::invocation_log::testing::RecordingLog;

    #[tokio::test]
    async fn invoke_returns_fixed_plain_text_greeting() {
        let endpoint = Endpoint::new("Endpoint", RecordingLog::default());
        let resp = endpoint.invoke();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Welcome to Azure Functions!");
    }

    #[test]
    fn invoke_sets_exactly_one_content_type() {
        let endpoint = Endpoint::new("Endpoint", RecordingLog::default());
        let resp = endpoint.invoke();
        assert_eq!(resp.headers().get_all(header::CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn each_invocation_logs_one_line_under_function_name() {
        let endpoint = Endpoint::new("Endpoint", RecordingLog::default());
        endpoint.invoke();
        endpoint.invoke();

        let lines = endpoint.log().lines();
        assert_eq!(lines.len(), 2);
        for (category, message) in lines {
            assert_eq!(category, "Endpoint");
            assert_eq!(message, "HTTP trigger function processed a request.");
        }
    }

    #[test]
    fn name_is_the_configured_function_name() {
        let endpoint = Endpoint::new("Welcome", RecordingLog::default());
        assert_eq!(endpoint.name(), "Welcome");
    }
}
