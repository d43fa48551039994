//! Startup error types for welcome-fn.
//!
//! The request path has no failure modes of its own: the `Endpoint` handler
//! always answers 200 and anything else (unknown path, unsupported method) is
//! rejected by the router. What *can* go wrong is bringing the process up, so
//! [`ConfigError`] covers the configuration layer and `main` wraps it in
//! [`anyhow`] with context before exiting.

use std::path::PathBuf;

/// Everything that can make the configuration unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config TOML from {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The Functions host hands us the port as a string in the environment.
    #[error("environment variable `{var}` is not a valid port: `{value}`")]
    InvalidPort { var: &'static str, value: String },

    #[error("`{field}` must be a non-empty path segment of [A-Za-z0-9_-], got `{value}`")]
    InvalidRouteSegment { field: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn invalid_port_message_names_variable_and_value() {
        let err = ConfigError::InvalidPort {
            var: "FUNCTIONS_CUSTOMHANDLER_PORT",
            value: "eighty".into(),
        };
        let s = err.to_string();
        assert!(s.contains("FUNCTIONS_CUSTOMHANDLER_PORT"), "message: {s}");
        assert!(s.contains("eighty"), "message: {s}");
    }

    #[test]
    fn read_error_keeps_io_source() {
        let err = ConfigError::Read {
            path: PathBuf::from("/nope/config.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file missing"),
        };
        assert!(err.to_string().contains("/nope/config.toml"));
        let source = err.source().expect("io error should be the source");
        assert!(source.to_string().contains("file missing"));
    }

    #[test]
    fn converts_into_anyhow_with_chain_intact() {
        let err = ConfigError::InvalidRouteSegment {
            field: "function.name",
            value: "a/b".into(),
        };
        let any: anyhow::Error = err.into();
        assert!(format!("{any:#}").contains("function.name"));
    }
}
