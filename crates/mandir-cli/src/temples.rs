use clap::Subcommand;
use mandir_core::{AppConfig, Temple};

use crate::or_dash;

/// Sub-commands available under `temples`.
#[derive(Debug, Subcommand)]
pub enum TemplesCommands {
    /// List every active temple
    List,
    /// Show one temple in full
    Show {
        /// Temple id
        id: i64,
    },
}

pub(crate) async fn run(config: &AppConfig, command: TemplesCommands) -> anyhow::Result<()> {
    let pool = crate::connect(config).await?;

    match command {
        TemplesCommands::List => {
            let temples: Vec<Temple> = mandir_db::list_temples(&pool)
                .await?
                .into_iter()
                .map(Temple::from)
                .collect();

            if temples.is_empty() {
                println!("no temples found; run `db seed` first");
                return Ok(());
            }

            println!("{:<6}{:<20}{:<8}ADDRESS", "ID", "CITY", "REGION");
            for temple in &temples {
                println!(
                    "{:<6}{:<20}{:<8}{}",
                    temple.id,
                    temple.city,
                    or_dash(temple.region.as_deref()),
                    temple.address
                );
            }
        }
        TemplesCommands::Show { id } => {
            let temple = mandir_db::get_temple(&pool, id)
                .await?
                .map(Temple::from)
                .ok_or_else(|| anyhow::anyhow!("temple {id} not found"))?;
            print_detail(&temple);
        }
    }

    Ok(())
}

fn print_detail(temple: &Temple) {
    println!("{} ({})", temple.city, or_dash(temple.region.as_deref()));
    println!("{}", temple.address);
    println!();
    println!("Phone:   {}", or_dash(temple.phone.as_deref()));
    println!("Fax:     {}", or_dash(temple.fax.as_deref()));
    println!("Email:   {}", or_dash(temple.email.as_deref()));
    println!("Hours:   {}", or_dash(temple.operating_hours.as_deref()));
    println!("Days:    {}", or_dash(temple.operating_days.as_deref()));
    match temple.coordinates() {
        Some(at) => println!("Located: {:.4}, {:.4}", at.latitude, at.longitude),
        None => println!("Located: \u{2014}"),
    }
}
