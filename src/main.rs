use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};

mod api;
mod config;
mod error;
mod invocation_log;

use api::endpoint::Endpoint;
use config::{Config, LogFormat, ServerConfig};
use invocation_log::TracingLog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Container HEALTHCHECK mode: hit /healthz and exit without serving.
    if std::env::args().nth(1).as_deref() == Some("--healthcheck") {
        return healthcheck().await;
    }

    let (config, config_path) = Config::from_env().context("failed to load configuration")?;

    init_tracing(&config.server);

    match &config_path {
        Some(path) => info!(path = %path.display(), "config loaded"),
        None => info!("no config file, using defaults"),
    }

    let addr = config.server.listen_addr();
    let endpoint = Arc::new(Endpoint::new(config.function.name.clone(), TracingLog));
    info!(
        function = endpoint.name(),
        route = %config.function.route(),
        "welcome-fn starting"
    );

    let app = api::router(endpoint, &config.function);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "custom handler listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

fn init_tracing(server: &ServerConfig) {
    let default_filter = server
        .log_level
        .clone()
        .unwrap_or_else(|| "welcome_fn=info,tower_http=warn".into());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match server.log_format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
}

/// Lightweight healthcheck: GET /healthz and exit 0 on 200, 1 otherwise.
///
/// Resolves the address the same way the server does, so it works both under
/// the Functions host and standalone. Diagnostics go to stderr so they show up
/// in the container's health log.
async fn healthcheck() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let server = match Config::from_env() {
        Ok((config, _)) => config.server,
        Err(e) => {
            let fallback = ServerConfig::default();
            warn!(
                error = ?e,
                addr = %fallback.probe_addr(),
                "config unusable, probing default address"
            );
            fallback
        }
    };

    let url = format!("http://{}/healthz", server.probe_addr());
    let healthy = match reqwest::get(&url).await {
        Ok(resp) => {
            if !resp.status().is_success() {
                warn!(%url, status = %resp.status(), "healthcheck failed");
            }
            resp.status().is_success()
        }
        Err(e) => {
            warn!(%url, error = %e, "healthcheck request failed");
            false
        }
    };

    std::process::exit(if healthy { 0 } else { 1 });
}
