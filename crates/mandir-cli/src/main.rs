mod db;
mod search;
mod temples;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::db::DbCommands;
use crate::search::SearchArgs;
use crate::temples::TemplesCommands;

#[derive(Debug, Parser)]
#[command(name = "mandir-cli")]
#[command(about = "Temple locator command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Browse stored temples
    Temples {
        #[command(subcommand)]
        command: TemplesCommands,
    },
    /// Find the temples nearest a location
    Search(SearchArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = mandir_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Db { command }) => db::run(&config, command).await?,
        Some(Commands::Temples { command }) => temples::run(&config, command).await?,
        Some(Commands::Search(args)) => search::run(&config, args).await?,
        None => println!("mandir-cli ready; run with --help for commands"),
    }

    Ok(())
}

/// Connect using the pool settings from `config`.
async fn connect(config: &mandir_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = mandir_db::PoolConfig::from_app_config(config);
    let pool = mandir_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

/// Display value for an optional field; `None` prints as a dash.
fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("\u{2014}")
}
