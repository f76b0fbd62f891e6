use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::info;

use listingintel::entities::choices::{BuildingType, Choice, DealerType, HeatingMode, MarketingType, PropertyType};
use listingintel::{config, db, run_bienici_listing, stats, AppError, StatisticsQuery};

#[derive(Debug, Parser)]
#[command(name = "listingintel", version, about = "Query and enrich the listing store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Price, surface and fee statistics for a department, city or postal code
    Stats {
        /// department, city or postal_code
        #[arg(long = "type")]
        query_type: String,
        /// Value to match (cities match case-insensitively)
        #[arg(long = "value")]
        query_value: String,
    },
    /// Add or refresh one listing from its BienIci URL
    Add {
        /// e.g. https://www.bienici.com/annonce/orpi-1-099934E0KUR9
        #[arg(long)]
        url: String,
    },
    /// Print the accepted values of the classification columns
    Choices,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    listingintel::init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Stats { query_type, query_value } => {
            let query = StatisticsQuery::parse(&query_type, &query_value)?;
            let conn = db::connect().await.context("failed to connect to database")?;
            match stats::compute_statistics(&conn, &query).await? {
                Some(statistics) => println!("{}", serde_json::to_string_pretty(&statistics)?),
                None => return Err(AppError::NotFound(query.to_string()).into()),
            }
        }
        Command::Add { url } => {
            let conn = db::connect().await.context("failed to connect to database")?;
            let listing = run_bienici_listing(&conn, &config::bienici_api_url(), &url).await?;
            info!("Successfully added listing: {}", listing.reference_id);
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Command::Choices => {
            print_choices("property_type", PropertyType::choices());
            print_choices("marketing_type", MarketingType::choices());
            print_choices("heating_mode", HeatingMode::choices());
            print_choices("building_type", BuildingType::choices());
            print_choices("dealer_type", DealerType::choices());
        }
    }
    Ok(())
}

fn print_choices(column: &str, choices: Vec<(String, String)>) {
    println!("{}:", column);
    for (value, label) in choices {
        println!("  {:<14} {}", value, label);
    }
}
