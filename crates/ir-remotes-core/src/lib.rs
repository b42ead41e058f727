//! Core library for IR remote capture and dispatch.
//!
//! Holds the device directory and command registries, the bounded
//! polling capture engine, and the dispatch pipeline shared by the CLI
//! and the HTTP service. Hardware access goes through the
//! [`transport::Blaster`] capability boundary.

pub mod capture;
pub mod command;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod remote;
pub mod storage;
pub mod transport;

pub use command::{CommandRegistry, IrCommand};
pub use device::{Device, DeviceDirectory, SessionTable};
pub use error::{CoreError, Result};
pub use remote::{Remote, RemoteList};
