//! ir-remotes CLI - capture and replay infra-red commands through
//! network IR blaster appliances, from the terminal or over HTTP.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ir_remotes_cli::cli::{Cli, Commands};
use ir_remotes_cli::commands::{self, Context};
use ir_remotes_cli::error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    // Structured logging, level overridden by RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context::new(
        cli.remotes_file,
        cli.devices_file,
        cli.udp_timeout,
        cli.json,
    );

    match cli.command {
        Commands::Devices(args) => commands::run_devices(args, &ctx).await,
        Commands::Remotes(args) => commands::run_remotes(args, &ctx).await,
        Commands::Capture(args) => commands::run_capture(args, &ctx).await,
        Commands::Send(args) => commands::run_send(args, &ctx).await,
        Commands::Serve(args) => commands::run_serve(args, &ctx).await,
    }
}
