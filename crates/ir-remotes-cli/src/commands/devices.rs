//! Appliance discovery and listing.

use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

use tracing::{info, warn};

use ir_remotes_core::device::DeviceDirectory;
use ir_remotes_core::storage::{load_json, save_json};
use ir_remotes_core::transport::{udp, DiscoveredDevice};

use super::Context;
use crate::cli::{DeviceCommands, DevicesArgs, DiscoverArgs};
use crate::error::{CliError, Result};
use crate::output::get_formatter;

/// Run the devices command
pub async fn run_devices(args: DevicesArgs, ctx: &Context) -> Result<()> {
    match args.command {
        DeviceCommands::Discover(args) => run_discover(args, ctx).await,
        DeviceCommands::List => run_list(ctx).await,
    }
}

async fn run_discover(args: DiscoverArgs, ctx: &Context) -> Result<()> {
    let mut directory: DeviceDirectory = load_json(&ctx.devices_file)
        .await?
        .unwrap_or_default();

    info!("Looking for IR blaster appliances on your network. Please wait...");
    let discovered = udp::discover(Duration::from_secs(args.timeout)).await?;
    if discovered.is_empty() {
        return Err(CliError::NoDevicesFound);
    }

    for item in &discovered {
        info!(
            address = %item.udp_address,
            mac = %item.mac_address,
            model = item.model_name().unwrap_or("unknown"),
            "Found appliance."
        );
    }

    let assume_name = args.assume_name.clone();
    let added = directory.merge_discovered(&discovered, |item| {
        Some(match &assume_name {
            Some(name) => name.clone(),
            None => prompt_name(item),
        })
    });

    if added > 0 {
        save_json(&ctx.devices_file, &directory).await?;
        info!(
            devices_file = %ctx.devices_file.display(),
            "Saved appliance information to file"
        );
    } else {
        info!("No new appliance found.");
    }

    let formatter = get_formatter(ctx.json);
    println!("{}", formatter.format_devices(directory.devices()));
    Ok(())
}

async fn run_list(ctx: &Context) -> Result<()> {
    let directory: DeviceDirectory = load_json(&ctx.devices_file)
        .await?
        .unwrap_or_default();

    let formatter = get_formatter(ctx.json);
    println!("{}", formatter.format_devices(directory.devices()));
    Ok(())
}

/// Ask the operator to name a new appliance. Falls back to "unnamed"
/// when stdin is not a terminal, matching headless runs.
fn prompt_name(item: &DiscoveredDevice) -> String {
    if !io::stdin().is_terminal() {
        return "unnamed".to_string();
    }

    let model = item.model_name().unwrap_or("unknown model");
    print!(
        "Name for appliance {} ({}) [unnamed]: ",
        item.mac_address, model
    );
    if io::stdout().flush().is_err() {
        return "unnamed".to_string();
    }

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => {
            let name = line.trim();
            if name.is_empty() {
                "unnamed".to_string()
            } else {
                name.to_string()
            }
        }
        Err(e) => {
            warn!(error = %e, "failed to read appliance name, using \"unnamed\"");
            "unnamed".to_string()
        }
    }
}
