//! Capture command: record named IR codes from a physical remote.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use ir_remotes_core::capture::capture_ir_code;
use ir_remotes_core::device::{Device, DeviceDirectory, SessionTable};
use ir_remotes_core::remote::RemoteList;
use ir_remotes_core::storage::{load_json, save_json};
use ir_remotes_core::transport::udp;

use super::Context;
use crate::cli::CaptureArgs;
use crate::error::{CliError, Result};

/// Run the capture command
pub async fn run_capture(args: CaptureArgs, ctx: &Context) -> Result<()> {
    let mut remotes: RemoteList = load_json(&ctx.remotes_file)
        .await?
        .unwrap_or_default();

    let device = select_device(
        ctx,
        args.device_name.as_deref(),
        Duration::from_secs(args.discovery_timeout),
    )
    .await?;

    let sessions = SessionTable::with_udp(ctx.udp_timeout);
    let handle = sessions.resolve(&device, ctx.udp_timeout).await?;

    let capture_timeout = Duration::from_secs(args.capture_timeout);
    let remote = remotes.find_or_create(&args.remote_name);

    for name in &args.commands {
        // Already-captured names are skipped, never overwritten.
        if remote.commands.contains(name) {
            info!(command = %name, "Command name already exists. Skipping capture.");
            continue;
        }

        let spinner = wait_spinner(name);
        let captured = capture_ir_code(handle.as_ref(), capture_timeout).await;
        spinner.finish_and_clear();

        let code = captured?;
        info!(command = %name, bytes = code.len(), "Captured IR code.");

        if let Err(e) = remote.commands.insert(name, code) {
            error!(command = %name, error = %e, "Failed to add command to remote");
            continue;
        }
    }

    save_json(&ctx.remotes_file, &remotes).await?;
    info!(
        remotes_file = %ctx.remotes_file.display(),
        remote = %args.remote_name,
        "Saved remotes to file"
    );
    Ok(())
}

/// Pick the appliance to capture with: the only configured one, the one
/// named with --device-name, or a one-shot discovery when the devices
/// file is empty (which must find exactly one appliance).
async fn select_device(
    ctx: &Context,
    device_name: Option<&str>,
    discovery_timeout: Duration,
) -> Result<Device> {
    let directory: DeviceDirectory = load_json(&ctx.devices_file)
        .await?
        .unwrap_or_default();

    if directory.is_empty() {
        return discover_one(discovery_timeout).await;
    }

    if directory.len() == 1 {
        return Ok(directory.first().unwrap().clone());
    }

    let Some(name) = device_name else {
        return Err(CliError::InvalidArgument(
            "Multiple appliances listed in devices file. \
             Use the --device-name option to select one."
                .to_string(),
        ));
    };
    directory
        .by_name(name)
        .cloned()
        .ok_or_else(|| CliError::NoSuchDevice(name.to_string()))
}

async fn discover_one(timeout: Duration) -> Result<Device> {
    info!("Looking for IR blaster appliances on your network. Please wait...");
    let mut discovered = udp::discover(timeout).await?;

    match discovered.len() {
        0 => Err(CliError::NoDevicesFound),
        1 => {
            let found = discovered.remove(0);
            info!(
                address = %found.udp_address,
                mac = %found.mac_address,
                "Appliance found!"
            );
            Ok(Device::from_discovered("discovered", &found))
        }
        _ => Err(CliError::MultipleDevicesFound),
    }
}

fn wait_spinner(command: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("static spinner template"),
    );
    spinner.set_message(format!(
        "Waiting for IR code. Press the {:?} button...",
        command
    ));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
