//! IR command codec and registry.

pub mod ircommand;
pub mod registry;

pub use ircommand::IrCommand;
pub use registry::CommandRegistry;
