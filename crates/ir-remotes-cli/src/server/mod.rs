//! HTTP control surface for dispatching stored IR commands.
//!
//! Read-mostly: listing endpoints only read the in-memory directory and
//! remote list; the dispatch endpoint additionally resolves (and, on
//! first use, authenticates) the target appliance handle. Nothing here
//! persists new state.

mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::sync::RwLock;
use tracing::info;

use ir_remotes_core::device::{DeviceDirectory, SessionTable};
use ir_remotes_core::remote::RemoteList;

use crate::error::{CliError, Result};

/// Shared state behind every request handler.
pub struct ServerState {
    pub directory: RwLock<DeviceDirectory>,
    pub remotes: RwLock<RemoteList>,
    pub sessions: SessionTable,
    pub udp_timeout: Duration,
}

impl ServerState {
    pub fn new(directory: DeviceDirectory, remotes: RemoteList, udp_timeout: Duration) -> Self {
        Self {
            directory: RwLock::new(directory),
            remotes: RwLock::new(remotes),
            sessions: SessionTable::with_udp(udp_timeout),
            udp_timeout,
        }
    }

    /// State with a caller-supplied session table, for tests that stub
    /// out the hardware transport.
    pub fn with_sessions(
        directory: DeviceDirectory,
        remotes: RemoteList,
        sessions: SessionTable,
        udp_timeout: Duration,
    ) -> Self {
        Self {
            directory: RwLock::new(directory),
            remotes: RwLock::new(remotes),
            sessions,
            udp_timeout,
        }
    }
}

/// Build the API router.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/devices/", get(routes::get_devices))
        .route("/api/devices/:device", get(routes::get_device))
        .route("/api/remotes/", get(routes::get_remotes))
        .route("/api/remotes/:remote", get(routes::get_remote))
        .route(
            "/api/remotes/:remote/:command",
            axum::routing::post(routes::post_remote_command).get(routes::method_not_allowed),
        )
        .with_state(state)
}

/// Bind and serve until interrupted.
pub async fn serve(listen_address: &str, state: Arc<ServerState>) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(listen_address)
        .await
        .map_err(|e| {
            CliError::Other(format!("Failed to bind {}: {}", listen_address, e))
        })?;
    info!(listen_address = %listen_address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CliError::Other(format!("Server terminated: {}", e)))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
