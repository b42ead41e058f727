//! Error types for the ir-remotes CLI.
//!
//! CliError wraps CoreError from the shared library and adds
//! CLI-specific variants.

use ir_remotes_core::error::CoreError;
use thiserror::Error;

// Re-export core error types so command modules can use them via crate::error
pub use ir_remotes_core::error::{
    CaptureError, DispatchError, StorageError, TransportError,
};

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NETWORK_ERROR: i32 = 2;
    pub const DEVICE_ERROR: i32 = 3;
    pub const INVALID_ARGS: i32 = 4;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No appliance found")]
    NoDevicesFound,

    #[error(
        "Multiple appliances found. Run `ir-remotes devices discover` first, \
         then select one with --device-name"
    )]
    MultipleDevicesFound,

    #[error("No such device named {0:?} in devices file")]
    NoSuchDevice(String),

    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(e) => match e {
                CoreError::Transport(_) | CoreError::Capture(_) => exit_codes::DEVICE_ERROR,
                CoreError::Dispatch(_) => exit_codes::DEVICE_ERROR,
                CoreError::Storage(_) => exit_codes::GENERAL_ERROR,
                _ => exit_codes::GENERAL_ERROR,
            },
            CliError::Io(_) => exit_codes::GENERAL_ERROR,
            CliError::InvalidArgument(_) => exit_codes::INVALID_ARGS,
            CliError::NoDevicesFound => exit_codes::NETWORK_ERROR,
            CliError::MultipleDevicesFound => exit_codes::INVALID_ARGS,
            CliError::NoSuchDevice(_) => exit_codes::INVALID_ARGS,
            CliError::Other(_) => exit_codes::GENERAL_ERROR,
        }
    }
}

// Conversions from core error subtypes to CliError
impl From<TransportError> for CliError {
    fn from(e: TransportError) -> Self {
        CliError::Core(CoreError::Transport(e))
    }
}

impl From<CaptureError> for CliError {
    fn from(e: CaptureError) -> Self {
        CliError::Core(CoreError::Capture(e))
    }
}

impl From<DispatchError> for CliError {
    fn from(e: DispatchError) -> Self {
        CliError::Core(CoreError::Dispatch(e))
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        CliError::Core(CoreError::Storage(e))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
