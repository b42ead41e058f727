//! Command implementations.

pub mod capture;
pub mod devices;
pub mod remotes;
pub mod send;
pub mod serve;

pub use capture::run_capture;
pub use devices::run_devices;
pub use remotes::run_remotes;
pub use send::run_send;
pub use serve::run_serve;

use std::path::PathBuf;
use std::time::Duration;

/// Global options shared by every subcommand.
pub struct Context {
    pub remotes_file: PathBuf,
    pub devices_file: PathBuf,
    pub udp_timeout: Duration,
    pub json: bool,
}

impl Context {
    pub fn new(remotes_file: PathBuf, devices_file: PathBuf, udp_timeout_ms: u64, json: bool) -> Self {
        Self {
            remotes_file,
            devices_file,
            udp_timeout: Duration::from_millis(udp_timeout_ms),
            json,
        }
    }
}
