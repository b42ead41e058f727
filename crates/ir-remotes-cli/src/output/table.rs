//! Table-formatted output for CLI.

use colored::*;
use comfy_table::{Cell, ContentArrangement, Table};

use ir_remotes_core::device::Device;
use ir_remotes_core::remote::Remote;

use super::OutputFormatter;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_devices(&self, devices: &[Device]) -> String {
        if devices.is_empty() {
            return "No appliances found.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Name", "Address", "MAC", "Type", "Model"]);

        for device in devices {
            table.add_row(vec![
                Cell::new(&device.name),
                Cell::new(&device.udp_address),
                Cell::new(&device.mac_address),
                Cell::new(format!("{:#06x}", device.device_type)),
                Cell::new(device.type_name.as_deref().unwrap_or("-")),
            ]);
        }

        format!("{}\n\nFound {} appliance(s)", table, devices.len())
    }

    fn format_remotes(&self, remotes: &[Remote]) -> String {
        if remotes.is_empty() {
            return "No remotes found.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Remote", "Commands"]);

        for remote in remotes {
            table.add_row(vec![
                Cell::new(&remote.name),
                Cell::new(remote.commands.names().join(", ")),
            ]);
        }

        format!("{}\n\nFound {} remote(s)", table, remotes.len())
    }

    fn format_success(&self, message: &str) -> String {
        format!("{} {}", "[OK]".green(), message)
    }
}
