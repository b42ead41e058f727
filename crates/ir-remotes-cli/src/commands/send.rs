//! Send command: replay a stored IR code through an appliance.

use tracing::info;

use ir_remotes_core::device::{DeviceDirectory, SessionTable};
use ir_remotes_core::dispatch::dispatch;
use ir_remotes_core::remote::RemoteList;
use ir_remotes_core::storage::load_json;

use super::Context;
use crate::cli::SendArgs;
use crate::error::Result;
use crate::output::get_formatter;

/// Run the send command
pub async fn run_send(args: SendArgs, ctx: &Context) -> Result<()> {
    let directory: DeviceDirectory = load_json(&ctx.devices_file)
        .await?
        .unwrap_or_default();
    let remotes: RemoteList = load_json(&ctx.remotes_file)
        .await?
        .unwrap_or_default();

    let sessions = SessionTable::with_udp(ctx.udp_timeout);

    dispatch(
        &directory,
        &remotes,
        &sessions,
        &args.remote,
        &args.command,
        args.device_name.as_deref(),
        ctx.udp_timeout,
    )
    .await?;

    info!(remote = %args.remote, command = %args.command, "Command sent.");

    let formatter = get_formatter(ctx.json);
    println!(
        "{}",
        formatter.format_success(&format!("sent {}/{}", args.remote, args.command))
    );
    Ok(())
}
