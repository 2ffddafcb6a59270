use anyhow::Result;
use clap::Parser;
use wallet_aggregate::cli::{execute_filter, execute_progress, execute_sum, Cli, Commands};
use wallet_aggregate::services::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.options.log_format.into());

    match cli.command {
        Commands::Sum => execute_sum(&cli.options).await,
        Commands::Filter { account, list } => execute_filter(&cli.options, account, list).await,
        Commands::Progress { block_size } => execute_progress(&cli.options, block_size).await,
    }
}
