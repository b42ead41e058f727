//! Error types for ir-remotes core.

use std::time::Duration;

use thiserror::Error;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed canonical hex representation of an IR code.
#[derive(Debug, Error, PartialEq)]
#[error("invalid IR code hex: {0}")]
pub struct DecodeError(#[from] pub hex::FromHexError);

/// Command registry errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command {0:?} already exists in registry")]
    AlreadyExists(String),

    #[error("command name cannot be empty")]
    EmptyName,
}

/// Device directory errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error(
        "device {name:?} already exists but MAC address does not match \
         (existing={existing}, new={new})"
    )]
    NamingConflict {
        name: String,
        existing: String,
        new: String,
    },
}

/// Hardware transport errors, reported at the blaster capability boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to parse MAC address {0:?}")]
    InvalidMac(String),

    #[error("failed to parse UDP address {0:?}")]
    InvalidAddress(String),

    #[error("device {address} did not answer within {timeout:?}")]
    Timeout { address: String, timeout: Duration },

    #[error("authentication with {address} failed: {message}")]
    Auth { address: String, message: String },

    #[error("protocol error from {address}: {message}")]
    Protocol { address: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Capture engine failures.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to enter capture mode: {0}")]
    CaptureMode(TransportError),

    #[error(
        "received unexpected remote code class {observed:#04x} \
         (expected infra-red class {expected:#04x})"
    )]
    WrongCodeClass { observed: u8, expected: u8 },

    #[error("failed to read captured code: {0}")]
    Poll(TransportError),

    #[error("timed out waiting for IR control code after {0:?}")]
    TimedOut(Duration),
}

/// Dispatch pipeline failures. Lookup misses map to HTTP 404, send
/// failures to 500.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no such remote named {0:?}")]
    RemoteNotFound(String),

    #[error("remote {remote:?} has no command {command:?}")]
    CommandNotFound { remote: String, command: String },

    #[error("no such device named {0:?}")]
    DeviceNotFound(String),

    #[error("no devices configured")]
    NoDevices,

    #[error("failed to authenticate with device {device:?}: {source}")]
    Auth {
        device: String,
        source: TransportError,
    },

    #[error("IR code send failure: {0}")]
    Send(TransportError),
}

impl DispatchError {
    /// True for lookup misses that the caller reports as not-found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DispatchError::RemoteNotFound(_)
                | DispatchError::CommandNotFound { .. }
                | DispatchError::DeviceNotFound(_)
                | DispatchError::NoDevices
        )
    }
}

/// JSON file persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: String,
        source: serde_json::Error,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
