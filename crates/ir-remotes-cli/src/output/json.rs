//! JSON-formatted output for CLI.

use serde::Serialize;
use serde_json::json;

use ir_remotes_core::device::Device;
use ir_remotes_core::remote::Remote;

use super::OutputFormatter;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_devices(&self, devices: &[Device]) -> String {
        let output = json!({
            "devices": devices,
            "count": devices.len()
        });
        Self::to_json(&output)
    }

    fn format_remotes(&self, remotes: &[Remote]) -> String {
        let items: Vec<_> = remotes
            .iter()
            .map(|r| {
                json!({
                    "name": r.name,
                    "commands": r.commands.names()
                })
            })
            .collect();

        Self::to_json(&json!({
            "remotes": items,
            "count": remotes.len()
        }))
    }

    fn format_success(&self, message: &str) -> String {
        Self::to_json(&json!({
            "success": true,
            "message": message
        }))
    }
}
