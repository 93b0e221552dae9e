//! Command-line interface for the supply-chain risk analyst
//!
//! ```bash
//! supply-risk generate --seed 42
//! supply-risk index --replace
//! supply-risk query "suppliers in Taiwan"
//! OPENROUTER_API_KEY=... GNEWS_API_KEY=... supply-risk run
//! ```

mod cli;
mod commands;
mod console;

use clap::Parser;
use cli::{Cli, Commands};
use supply_core::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    supply_core::init_tracing(&cli.log);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    info!(
        data_dir = %config.data.data_dir.display(),
        db_dir = %config.index.db_dir.display(),
        embedding = ?config.embedding.backend,
        "Configuration loaded"
    );

    match &cli.command {
        Commands::Generate(_) => commands::generate(&config),
        Commands::Index(_) => commands::index(&config).await,
        Commands::Query(args) => commands::query(&config, args).await,
        Commands::News(args) => commands::news(&config, args).await,
        Commands::Run(args) => commands::run(&config, args).await,
    }
}
