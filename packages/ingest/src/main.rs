#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the film-permit ingestion tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use permit_map_dataset::{block_rows, permit_counts_by_zip};
use permit_map_geometry::index::StreetCenterlineIndex;
use permit_map_geometry::zones::ZipBoundaryIndex;
use permit_map_ingest::{build_permits, closures_to_geojson, resolve_closures};
use permit_map_source::config::FeedConfig;
use permit_map_source::film_permits::FilmPermitFeed;
use permit_map_source::{FetchOptions, PermitFeed as _};

#[derive(Parser)]
#[command(name = "permit_map_ingest", about = "NYC film permit ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch raw permit rows from the NYC open data API
    Fetch {
        /// Only fetch permits starting on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<chrono::NaiveDate>,
        /// Maximum number of records to fetch (for testing)
        #[arg(long)]
        limit: Option<u64>,
        /// Directory to store the downloaded file
        #[arg(long, default_value = "data")]
        output_dir: PathBuf,
        /// Path to a TOML config file with the Socrata app token
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Resolve closure geometry for previously fetched permit rows
    Resolve {
        /// Raw permit rows JSON (from `fetch`)
        input: PathBuf,
        /// Street centerline GeoJSON file
        #[arg(long)]
        streets: PathBuf,
        /// ZIP boundary GeoJSON file; enables per-closure ZIP attribution
        #[arg(long)]
        zips: Option<PathBuf>,
        /// Output GeoJSON path for the resolved closures
        #[arg(long, default_value = "closures.geojson")]
        output: PathBuf,
    },
    /// Print the wide-to-long permit × block dataset as JSON
    Dataset {
        /// Raw permit rows JSON (from `fetch`)
        input: PathBuf,
    },
    /// Print distinct-permit counts per ZIP code as JSON
    Counts {
        /// Raw permit rows JSON (from `fetch`)
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            since,
            limit,
            output_dir,
            config,
        } => {
            let feed_config = match config {
                Some(path) => FeedConfig::from_file(&path)?,
                None => FeedConfig::default(),
            };
            let feed = FilmPermitFeed::new(feed_config);
            let options = FetchOptions {
                since,
                limit,
                output_dir,
            };
            let path = feed.fetch(&options).await?;
            log::info!("Wrote raw permit rows to {}", path.display());
        }
        Commands::Resolve {
            input,
            streets,
            zips,
            output,
        } => {
            let feed = FilmPermitFeed::default();
            let rows = feed.load(&input)?;
            let permits = build_permits(&rows);

            let index = StreetCenterlineIndex::from_file(&streets)?;
            let zones = zips.map(|path| ZipBoundaryIndex::from_file(&path)).transpose()?;

            let (closures, stats) = resolve_closures(&permits, &index);
            let collection = closures_to_geojson(&closures, zones.as_ref());
            std::fs::write(&output, serde_json::to_string(&collection)?)?;

            log::info!(
                "Wrote {} closures to {} ({} unresolved)",
                closures.len(),
                output.display(),
                stats.unresolved()
            );
        }
        Commands::Dataset { input } => {
            let feed = FilmPermitFeed::default();
            let rows = feed.load(&input)?;
            let permits = build_permits(&rows);
            let dataset = block_rows(&permits);
            println!("{}", serde_json::to_string_pretty(&dataset)?);
        }
        Commands::Counts { input } => {
            let feed = FilmPermitFeed::default();
            let rows = feed.load(&input)?;
            let permits = build_permits(&rows);
            let counts = permit_counts_by_zip(&permits);
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
    }

    Ok(())
}
