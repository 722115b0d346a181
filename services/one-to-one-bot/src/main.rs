//! One-to-One Bot
//!
//! Slack app that answers the `/1:1` slash command with a teammate to meet:
//! 1. Serves the "Add to Slack" landing page
//! 2. Completes the OAuth install and stores each team's bot token
//! 3. Picks a random active teammate (or any eligible one when nobody is
//!    around) and replies in channel

mod config;
mod error;
mod metrics;
mod routes;
mod state;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use matchmaker::{Authorizer, Matchmaker, OAuthClient};
use slack_api::SlackClient;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use team_store::{CredentialStore, HashBackend, MemoryBackend, RedisBackend};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::state::{AppState, DRAIN_TIMEOUT, ServiceMetrics};

const MEMORY_STORE_URL: &str = "memory://";

/// Build the axum router with all routes and shared state.
///
/// The concurrency limit caps in-flight requests at `max_connections`.
fn build_router(state: AppState, max_connections: usize) -> Router {
    Router::new()
        .route("/", get(routes::landing_handler))
        .route("/1:1", post(routes::command_handler))
        .route("/command", post(routes::command_handler))
        .route("/oauth", get(routes::oauth_handler))
        .route("/oauth/", get(routes::oauth_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(tower::limit::ConcurrencyLimitLayer::new(max_connections))
        .with_state(state)
}

/// Pick the hash backend for the configured store URL.
fn store_backend(url: &str, timeout: std::time::Duration) -> Result<Arc<dyn HashBackend>> {
    if url == MEMORY_STORE_URL {
        warn!("using in-memory credential store; installs are lost on restart");
        return Ok(Arc::new(MemoryBackend::new()));
    }
    let backend = RedisBackend::new(url, timeout).context("invalid REDIS_URL")?;
    Ok(Arc::new(backend))
}

#[tokio::main]
async fn main() -> Result<()> {
    // JSON logs; LOG_LEVEL, then RUST_LOG, then "info"
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("starting one-to-one-bot");

    // Install Prometheus metrics recorder before any metrics are emitted
    let prometheus_handle =
        metrics::install_recorder().context("failed to install Prometheus recorder")?;

    // CLI: simple --config flag parsing
    let args: Vec<String> = std::env::args().collect();
    let cli_config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str());

    let config_path = Config::resolve_path(cli_config_path);
    match &config_path {
        Some(path) => info!(path = %path.display(), "loading configuration"),
        None => info!("no config file, using environment only"),
    }

    let config = Config::load(config_path.as_deref()).context("failed to load configuration")?;

    info!(
        listen_addr = %config.server.listen_addr,
        api_base_url = %config.slack.api_base_url,
        timeout_secs = config.server.timeout_secs,
        max_connections = config.server.max_connections,
        "configuration loaded"
    );

    let http = reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .context("failed to build HTTP client")?;
    let slack = Arc::new(SlackClient::new(http, config.slack.api_base_url.clone()));

    let backend = store_backend(config.store.url.expose(), config.timeout())?;
    let store = CredentialStore::new(backend);

    let oauth_client = OAuthClient {
        client_id: config.slack.client_id.clone(),
        client_secret: config.slack.client_secret.clone(),
        redirect_uri: config.slack.redirect_uri.clone(),
    };

    let metrics = ServiceMetrics::new();
    let app_state = AppState {
        matchmaker: Matchmaker::new(store.clone(), slack.clone()),
        authorizer: Authorizer::new(oauth_client, slack, store),
        client_id: config.slack.client_id.clone(),
        redirect_uri: config.slack.redirect_uri.clone(),
        metrics: metrics.clone(),
        prometheus: prometheus_handle,
    };

    let app = build_router(app_state, config.server.max_connections);

    let listen_addr = config.server.listen_addr;
    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind to {listen_addr}"))?;

    info!(addr = %listen_addr, "accepting requests");

    let in_flight = metrics.in_flight.clone();

    // The drain timer starts when the shutdown signal fires: the server is told
    // to drain, then the drain races DRAIN_TIMEOUT.
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    shutdown_signal().await;

    let _ = shutdown_tx.send(());

    match tokio::time::timeout(DRAIN_TIMEOUT, server_handle).await {
        Ok(Ok(Ok(()))) => {
            info!("all in-flight requests drained");
        }
        Ok(Ok(Err(e))) => {
            error!(error = %e, "server error during shutdown");
        }
        Ok(Err(e)) => {
            error!(error = %e, "server task panicked");
        }
        Err(_) => {
            let remaining = in_flight.load(Ordering::Relaxed);
            warn!(
                remaining,
                drain_timeout_secs = DRAIN_TIMEOUT.as_secs(),
                "drain timeout exceeded, forcing shutdown"
            );
        }
    }

    info!("shutdown complete");
    Ok(())
}

/// Liveness plus request counters as JSON.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let body = serde_json::json!({
        "status": "healthy",
        "uptime_seconds": state.metrics.started_at.elapsed().as_secs(),
        "requests_served": state.metrics.requests_total.load(Ordering::Relaxed),
        "errors_total": state.metrics.errors_total.load(Ordering::Relaxed),
    });

    (
        axum::http::StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
}

/// Prometheus metrics endpoint in text exposition format.
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        axum::http::StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.prometheus.render(),
    )
}

/// Wait for SIGTERM or SIGINT.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
