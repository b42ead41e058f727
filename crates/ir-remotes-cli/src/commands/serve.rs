//! Serve command: expose the dispatch pipeline over HTTP.

use std::sync::Arc;

use tracing::info;

use ir_remotes_core::device::DeviceDirectory;
use ir_remotes_core::remote::RemoteList;
use ir_remotes_core::storage::load_json;

use super::Context;
use crate::cli::ServeArgs;
use crate::error::{CliError, Result};
use crate::server::{self, ServerState};

/// Run the serve command
pub async fn run_serve(args: ServeArgs, ctx: &Context) -> Result<()> {
    let directory: DeviceDirectory = load_json(&ctx.devices_file)
        .await?
        .ok_or_else(|| missing_file("devices", &ctx.devices_file))?;
    if directory.is_empty() {
        return Err(CliError::Other(format!(
            "No appliance listed in {}. Aborting.",
            ctx.devices_file.display()
        )));
    }

    let remotes: RemoteList = load_json(&ctx.remotes_file)
        .await?
        .ok_or_else(|| missing_file("remotes", &ctx.remotes_file))?;
    if remotes.is_empty() {
        return Err(CliError::Other(format!(
            "No remote listed in {}. Aborting.",
            ctx.remotes_file.display()
        )));
    }

    info!(
        devices = directory.len(),
        remotes = remotes.len(),
        listen_address = %args.listen_address,
        "Starting HTTP server"
    );

    let state = Arc::new(ServerState::new(directory, remotes, ctx.udp_timeout));
    server::serve(&args.listen_address, state).await
}

fn missing_file(kind: &str, path: &std::path::Path) -> CliError {
    CliError::Other(format!(
        "Failed to load {} from {}: file not found",
        kind,
        path.display()
    ))
}
