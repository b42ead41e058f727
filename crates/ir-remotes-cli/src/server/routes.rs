//! Request handlers for the HTTP API.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use ir_remotes_core::device::Device;
use ir_remotes_core::dispatch::dispatch;
use ir_remotes_core::error::DispatchError;

use super::ServerState;

/// Remote as the API reports it: its name and command names only, never
/// the code blobs.
#[derive(Debug, Serialize)]
pub struct RemoteSummary {
    pub name: String,
    pub commands: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendParams {
    pub device: Option<String>,
}

fn error_body(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(json!({ "success": false, "error": message })),
    )
        .into_response()
}

fn not_found(message: String) -> Response {
    error_body(StatusCode::NOT_FOUND, message)
}

/// GET /api/devices/
pub async fn get_devices(State(state): State<Arc<ServerState>>) -> Json<Vec<Device>> {
    let directory = state.directory.read().await;
    Json(directory.devices().to_vec())
}

/// GET /api/devices/:device
pub async fn get_device(
    State(state): State<Arc<ServerState>>,
    Path(device): Path<String>,
) -> Response {
    let directory = state.directory.read().await;
    match directory.by_name(&device) {
        Some(found) => Json(found.clone()).into_response(),
        None => not_found(format!("no such device named {:?}", device)),
    }
}

/// GET /api/remotes/
pub async fn get_remotes(State(state): State<Arc<ServerState>>) -> Json<Vec<String>> {
    let remotes = state.remotes.read().await;
    Json(remotes.names())
}

/// GET /api/remotes/:remote
pub async fn get_remote(
    State(state): State<Arc<ServerState>>,
    Path(remote): Path<String>,
) -> Response {
    let remotes = state.remotes.read().await;
    match remotes.find(&remote) {
        Some(found) => Json(RemoteSummary {
            name: found.name.clone(),
            commands: found.commands.names(),
        })
        .into_response(),
        None => not_found(format!("no such remote named {:?}", remote)),
    }
}

/// POST /api/remotes/:remote/:command[?device=NAME]
pub async fn post_remote_command(
    State(state): State<Arc<ServerState>>,
    Path((remote, command)): Path<(String, String)>,
    Query(params): Query<SendParams>,
) -> Response {
    let directory = state.directory.read().await;
    let remotes = state.remotes.read().await;

    let result = dispatch(
        &directory,
        &remotes,
        &state.sessions,
        &remote,
        &command,
        params.device.as_deref(),
        state.udp_timeout,
    )
    .await;

    match result {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) if e.is_not_found() => not_found(e.to_string()),
        Err(e @ (DispatchError::Auth { .. } | DispatchError::Send(_))) => {
            warn!(remote = %remote, command = %command, error = %e, "dispatch failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// GET on the dispatch path is not allowed; commands are only sent with
/// POST.
pub async fn method_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}
