//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// ir-remotes - capture and replay infra-red commands through network
/// IR blaster appliances
#[derive(Parser, Debug)]
#[command(name = "ir-remotes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Filename where remotes and their IR codes are loaded and saved
    #[arg(short = 'f', long, global = true, default_value = "remotes.json")]
    pub remotes_file: PathBuf,

    /// Filename where appliance device information is loaded and saved
    #[arg(short = 'd', long, global = true, default_value = "devices.json")]
    pub devices_file: PathBuf,

    /// Amount of time (ms) to wait for an answer from an appliance
    #[arg(long, global = true, default_value = "1000", env = "IR_REMOTES_UDP_TIMEOUT")]
    pub udp_timeout: u64,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage IR blaster appliances
    Devices(DevicesArgs),

    /// List remotes and their captured commands
    Remotes(RemotesArgs),

    /// Capture and save IR control codes
    Capture(CaptureArgs),

    /// Send a stored IR command through an appliance
    Send(SendArgs),

    /// HTTP server for sending IR commands
    Serve(ServeArgs),
}

// ==================== Devices ====================

#[derive(Args, Debug)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DeviceCommands,
}

#[derive(Subcommand, Debug)]
pub enum DeviceCommands {
    /// Discover appliances on the network and save them to the devices file
    Discover(DiscoverArgs),

    /// List appliances from the devices file
    List,
}

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Discovery timeout in seconds
    #[arg(short, long, default_value = "5")]
    pub timeout: u64,

    /// Name newly found appliances without prompting
    #[arg(long)]
    pub assume_name: Option<String>,
}

// ==================== Remotes ====================

#[derive(Args, Debug)]
pub struct RemotesArgs {
    #[command(subcommand)]
    pub command: RemoteCommands,
}

#[derive(Subcommand, Debug)]
pub enum RemoteCommands {
    /// List remotes from the remotes file
    List,
}

// ==================== Capture ====================

#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Name of the IR remote to record commands under
    #[arg(short = 'n', long)]
    pub remote_name: String,

    /// Name of the appliance to use for capture. Required when the
    /// devices file contains more than one entry
    #[arg(long)]
    pub device_name: Option<String>,

    /// IR control code capture timeout in seconds
    #[arg(long, default_value = "30")]
    pub capture_timeout: u64,

    /// Appliance network discovery timeout in seconds, used when the
    /// devices file is empty
    #[arg(long, default_value = "5")]
    pub discovery_timeout: u64,

    /// Command names to capture
    #[arg(required = true)]
    pub commands: Vec<String>,
}

// ==================== Send ====================

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Remote name
    pub remote: String,

    /// Command name within the remote
    pub command: String,

    /// Appliance to send through (default: first configured)
    #[arg(long)]
    pub device_name: Option<String>,
}

// ==================== Serve ====================

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Server listen address
    #[arg(short = 'l', long, default_value = "0.0.0.0:8080")]
    pub listen_address: String,
}
