//! ir-remotes CLI library: argument definitions, command
//! implementations, output formatting, and the HTTP server. The binary
//! in `main.rs` is a thin wrapper so integration tests can drive the
//! same code paths.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod server;
