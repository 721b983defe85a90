//! NotiTron - assignment reminder bot

mod cli;
mod discord;
mod logging;

use anyhow::Result;
use clap::Parser;
use notitron_core::config::Config;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Run) | None => cli::run::run(&config).await,
        Some(Commands::Add(args)) => cli::add::run(&config, args).await,
        Some(Commands::List(args)) => cli::list::run(&config, args).await,
        Some(Commands::Scan(args)) => cli::scan::run(&config, args).await,
        Some(Commands::Clean) => cli::clean::run(&config).await,
        Some(Commands::CheckConfig) => cli::check_config::run(&config),
    }
}
