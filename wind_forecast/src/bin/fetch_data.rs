//! Fetch historical weather observations for Santorini Monolithos and store
//! them as an observation table.
//!
//! Meteostat and Windy are only queried when `METEOSTAT_API_KEY` and
//! `WINDY_API_KEY` are set (a `.env` file is honoured).

use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wind_forecast::config::FetchConfig;
use wind_forecast::data::ObservationStore;
use wind_forecast::fetch::Fetcher;

#[derive(Debug, Parser)]
#[command(version, about = "Fetch weather observations into a CSV table")]
struct Args {
    /// First day to fetch (YYYY-MM-DD)
    #[arg(long, default_value = "2020-01-01")]
    start: NaiveDate,

    /// Last day to fetch (YYYY-MM-DD), today in UTC when omitted
    #[arg(long)]
    end: Option<NaiveDate>,

    /// CSV file to write
    #[arg(long, default_value = "data/data.csv")]
    output: PathBuf,

    /// Also write the rows to this Parquet file
    #[arg(long)]
    parquet: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let end = args.end.unwrap_or_else(|| Utc::now().date_naive());
    let config = FetchConfig::from_env().with_range(args.start, end);

    let fetcher = Fetcher::new(&config)?;
    tracing::info!(
        sources = ?fetcher.source_names(),
        start = %config.start,
        end = %config.end,
        "fetching observations"
    );
    let rows = fetcher.fetch_all(config.start, config.end);

    ObservationStore::write_csv(&rows, &args.output)?;
    tracing::info!("Saved {} rows to {}", rows.len(), args.output.display());

    if let Some(path) = &args.parquet {
        ObservationStore::write_parquet(&rows, path)?;
        tracing::info!("Saved {} rows to {}", rows.len(), path.display());
    }

    Ok(())
}
