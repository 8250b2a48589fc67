use std::path::PathBuf;

use clap::Subcommand;
use mandir_core::AppConfig;

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Load temples from the YAML data file into the database
    Seed {
        /// Path to the temples file (defaults to `MANDIR_TEMPLES_PATH`)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

pub(crate) async fn run(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = crate::connect(config).await?;

    match command {
        DbCommands::Ping => {
            mandir_db::health_check(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = mandir_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed { file } => {
            let path = file.unwrap_or_else(|| config.temples_path.clone());
            let temples_file = mandir_core::load_temples(&path)?;
            mandir_db::run_migrations(&pool).await?;
            let count = mandir_db::seed_temples(&pool, &temples_file.temples).await?;
            println!("seeded {count} temple(s) from {}", path.display());
        }
    }

    Ok(())
}
