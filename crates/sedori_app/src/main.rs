use anyhow::Result;
use clap::Parser;
use sedori_app::cli::Cli;
use sedori_app::logging::{self, LogDestination};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::initialize(
        LogDestination::from_flags(cli.log_file),
        logging::level_for(cli.verbose),
    );

    sedori_app::run(cli).await
}
