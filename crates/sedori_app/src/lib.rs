//! Command-line front end of the sedori research toolkit.
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

use std::time::Duration;

use anyhow::Result;

use crate::cli::{Cli, Commands};
use crate::commands::{dashboard, page, Context};
use crate::config::SedoriConfig;

/// Loads configuration and runs the parsed command.
pub async fn run(cli: Cli) -> Result<()> {
    let config = SedoriConfig::load(cli.config.as_deref())?.with_api_base(cli.api_base);
    let ctx = Context::new(config, cli.json);

    match cli.command {
        Commands::Scan {
            file,
            url,
            append,
            append_interval_ms,
            output,
        } => {
            page::scan(
                &ctx,
                &file,
                url,
                &append,
                Duration::from_millis(append_interval_ms),
                &output,
            )
            .await
        }
        Commands::Product { file, url, output } => page::product(&ctx, &file, url, &output).await,
        Commands::Auction { file, url, output } => page::auction(&ctx, &file, &url, &output),
        Commands::Search { keyword } => dashboard::search(&ctx, &keyword).await,
        Commands::History { keyword, count } => dashboard::history(&ctx, &keyword, count).await,
        Commands::Detail { auction_id } => dashboard::detail(&ctx, &auction_id).await,
        Commands::Monitor(command) => dashboard::monitor(&ctx, command).await,
        Commands::Pricing(command) => dashboard::pricing(&ctx, command).await,
        Commands::Amazon(command) => dashboard::amazon(&ctx, command).await,
        Commands::Templates(command) => dashboard::templates(&ctx, command).await,
        Commands::Notifications(command) => dashboard::notifications(&ctx, command).await,
        Commands::Scheduler(command) => dashboard::scheduler(&ctx, command).await,
    }
}
