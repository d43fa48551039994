//! Configuration types for welcome-fn.
//!
//! Config is optional: with no file present the handler runs on built-in
//! defaults, which is what the Azure Functions host expects. When a TOML file
//! is supplied it is validated before the server opens any ports. Invalid
//! configs are rejected with a clear error rather than silently falling back to
//! defaults.
//!
//! The listening port is normally not configured here at all. The Functions
//! host picks a port per worker and passes it in `FUNCTIONS_CUSTOMHANDLER_PORT`,
//! which always wins over `server.port`.
//!
//! # Example
//! ```toml
//! [server]
//! port      = 8080
//! log_level = "welcome_fn=debug"
//!
//! [function]
//! name         = "Endpoint"
//! route_prefix = "api"
//! ```

use std::{
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable the Functions host uses to tell a custom handler where to listen.
pub const PORT_ENV: &str = "FUNCTIONS_CUSTOMHANDLER_PORT";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "WELCOME_FN_CONFIG";

/// Config file picked up from the working directory when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "welcome-fn.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub function: FunctionConfig,
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the effective config from the process environment.
    ///
    /// Reads [`CONFIG_PATH_ENV`] and [`PORT_ENV`] and defers to [`Config::resolve`]
    /// with [`DEFAULT_CONFIG_FILE`] as the fallback path.
    pub fn from_env() -> Result<(Self, Option<PathBuf>), ConfigError> {
        Self::resolve(
            std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from),
            Path::new(DEFAULT_CONFIG_FILE),
            std::env::var(PORT_ENV).ok().as_deref(),
        )
    }

    /// Pick the config source and apply the host port.
    ///
    /// An `explicit` path must point at a readable file. Without it,
    /// `default_path` is used if it is a file and built-in defaults otherwise.
    /// The host-assigned `port` is applied last. Returns the file that was
    /// read, if any, so startup can log it.
    pub fn resolve(
        explicit: Option<PathBuf>,
        default_path: &Path,
        port: Option<&str>,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = match explicit {
            Some(path) => Some(path),
            None => default_path.is_file().then(|| default_path.to_path_buf()),
        };

        let mut config = match &path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_port_override(port)?;
        Ok((config, path))
    }

    /// Apply the host-assigned port, if one was given.
    ///
    /// Empty values are treated as unset; anything else must parse as a `u16`.
    pub fn apply_port_override(&mut self, value: Option<&str>) -> Result<(), ConfigError> {
        let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(());
        };
        self.server.port = raw.parse().map_err(|_| ConfigError::InvalidPort {
            var: PORT_ENV,
            value: raw.to_string(),
        })?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_segment("function.name", &self.function.name)?;
        validate_segment("function.route_prefix", &self.function.route_prefix)?;
        Ok(())
    }
}

fn validate_segment(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidRouteSegment {
            field,
            value: value.to_string(),
        })
    }
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port to listen on when the host does not assign one (default: 8080).
    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Interface to bind (default: `0.0.0.0`).
    #[serde(default = "defaults::bind_address")]
    pub bind_address: IpAddr,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Log line format (default: `text`).
    #[serde(default)]
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// Where a local health probe should connect.
    ///
    /// A wildcard bind is reachable on loopback; a specific interface is not
    /// necessarily, so it is probed directly.
    pub fn probe_addr(&self) -> SocketAddr {
        let ip = match self.bind_address {
            IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
            ip => ip,
        };
        SocketAddr::new(ip, self.port)
    }
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable, one line per event.
    #[default]
    Text,
    /// One JSON object per event, for log collectors.
    Json,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: defaults::port(),
            bind_address: defaults::bind_address(),
            log_level: None,
            log_format: LogFormat::default(),
        }
    }
}

/// How the function is exposed.
///
/// These must agree with the function folder name and `host.json`'s route
/// prefix, because the host forwards the original request path unchanged.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FunctionConfig {
    /// Function identifier, also the last route segment (default: `Endpoint`).
    #[serde(default = "defaults::function_name")]
    pub name: String,

    /// Leading route segment (default: `api`).
    #[serde(default = "defaults::route_prefix")]
    pub route_prefix: String,
}

impl FunctionConfig {
    /// The path the function answers on, e.g. `/api/Endpoint`.
    pub fn route(&self) -> String {
        format!("/{}/{}", self.route_prefix, self.name)
    }
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            name: defaults::function_name(),
            route_prefix: defaults::route_prefix(),
        }
    }
}

mod defaults {
    use std::net::{IpAddr, Ipv4Addr};

    pub fn port() -> u16 { 8080 }
    pub fn bind_address() -> IpAddr { IpAddr::V4(Ipv4Addr::UNSPECIFIED) }
    pub fn function_name() -> String { "Endpoint".into() }
    pub fn route_prefix() -> String { "api".into() }
}
