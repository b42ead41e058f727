//! Remote listing.

use ir_remotes_core::remote::RemoteList;
use ir_remotes_core::storage::load_json;

use super::Context;
use crate::cli::{RemoteCommands, RemotesArgs};
use crate::error::Result;
use crate::output::get_formatter;

/// Run the remotes command
pub async fn run_remotes(args: RemotesArgs, ctx: &Context) -> Result<()> {
    match args.command {
        RemoteCommands::List => run_list(ctx).await,
    }
}

async fn run_list(ctx: &Context) -> Result<()> {
    let remotes: RemoteList = load_json(&ctx.remotes_file)
        .await?
        .unwrap_or_default();

    let formatter = get_formatter(ctx.json);
    let list: Vec<_> = remotes.iter().cloned().collect();
    println!("{}", formatter.format_remotes(&list));
    Ok(())
}
