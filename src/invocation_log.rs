//! The logging capability handed to a function when it is constructed.
//!
//! Functions never reach for a global logger. They log through an
//! [`InvocationLog`] they were given, tagged with a category (the function
//! name), which keeps them testable: production wires in [`TracingLog`],
//! tests wire in something that records.

/// Sink for per-invocation log lines.
pub trait InvocationLog: Send + Sync + 'static {
    /// Record an informational line under `category`.
    fn info(&self, category: &str, message: &str);
}

/// Forwards invocation logs to [`tracing`], so they pick up the surrounding
/// request span and the subscriber installed in `main`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl InvocationLog for TracingLog {
    fn info(&self, category: &str, message: &str) {
        tracing::info!(category, "{message}");
    }
}


#[cfg(test)]
mod tests {
    use super::{testing::RecordingLog, *};

    #[test]
    fn recording_log_keeps_lines_in_order() {
        let log = RecordingLog::default();
        log.info("Endpoint", "first");
        log.info("Endpoint", "second");
        assert_eq!(
            log.lines(),
            vec![
                ("Endpoint".to_string(), "first".to_string()),
                ("Endpoint".to_string(), "second".to_string()),
            ]
        );
    }

    #[test]
    fn tracing_log_does_not_require_a_subscriber() {
        TracingLog.info("Endpoint", "no subscriber installed");
    }
}
