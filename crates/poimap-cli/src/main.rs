mod console;
mod locate;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "poimap")]
#[command(about = "Search points of interest and locate yourself on the map")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a keyword search and print the accumulated results
    Search {
        /// Search keyword (e.g., "seoul station")
        keyword: String,
        /// Number of pages to load, stopping early once results run out
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
        /// Plot the result at this 0-based index on the map
        #[arg(long)]
        select: Option<usize>,
    },
    /// Center the map on a position and show its address
    Locate {
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = poimap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search {
            keyword,
            pages,
            select,
        } => search::run_search(&config, &keyword, pages, select).await,
        Commands::Locate { lat, lon } => locate::run_locate(&config, lat, lon).await,
    }
}

#[cfg(test)]
mod tests;
