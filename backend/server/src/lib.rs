//! Active-user presence service.
//!
//! Tracks which clients have sent a heartbeat within the last two minutes.
//!
//!
//!
//! # Endpoints
//!
//! - `POST /active-users/heartbeat`: record the caller as seen now, returns `{ "success": true }`
//! - `GET /active-users`: returns `{ "count": n, "users": [{ "ip": "...", "lastSeen": millis }] }`
//! - `GET /health`: liveness probe
//!
//!
//!
//! # Client Identity
//!
//! Taken from the first of these headers that has a value:
//!
//! 1. `x-forwarded-for` (first comma-separated entry)
//! 2. `x-real-ip`
//! 3. `remote-addr`
//!
//! Otherwise the client is `"unknown"`, so all unidentified clients share one entry.
//!
//! Every one of these headers is client-supplied. Treat the results as rough
//! telemetry, never as an access-control signal.
//!
//!
//!
//! # Scaling
//!
//! Presence lives in process memory. Each instance only sees its own traffic and
//! restarts forget everything. If cross-instance visibility is ever needed, move the
//! map to a key-value store with per-key expiry and keep the two operations as they are.
//!
//!
//!
//! # Setup
//!
//! Environment variables:
//! - `RUST_PORT`: listen port, default `3000`
//! - `CORS_MAX_AGE`: preflight cache in seconds, default `3600`
//! - `RUST_LOG`: tracing filter, e.g. `presence=debug,tower_http=info`
//!
//! Run.
//! ```sh
//! RUST_LOG=info cargo run -p backend
//! ```
use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

#[cfg(unix)]
use signal::unix::{SignalKind, signal};
use signal::ctrl_c;
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod clock;
pub mod config;
pub mod error;
pub mod presence;
pub mod routes;
pub mod state;
pub mod utils;

use config::Config;
use error::ServerError;
use routes::{active_users_handler, health_handler, heartbeat_handler, not_found_handler};
use state::State;

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(state.config.cors_max_age);

    Router::new()
        .route("/active-users", get(active_users_handler))
        .route("/active-users/heartbeat", post(heartbeat_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> Result<(), ServerError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    serve().await.inspect_err(|e| error!("{e}"))
}

async fn serve() -> Result<(), ServerError> {
    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config);

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .map_err(ServerError::Bind)?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
}
