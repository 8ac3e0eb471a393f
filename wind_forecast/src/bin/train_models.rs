//! Train the forecasting models on an observation table and print the
//! next-value forecast of every measurement.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wind_forecast::config::PipelineConfig;
use wind_forecast::data::DataLoader;
use wind_forecast::pipeline;

#[derive(Debug, Parser)]
#[command(version, about = "Forecast each measurement with mean, quantile, LSTM and ensemble models")]
struct Args {
    /// Observation table (.csv or .parquet)
    #[arg(long)]
    data: Option<PathBuf>,

    /// JSON pipeline configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window length of the recurrent model
    #[arg(long)]
    lookback: Option<usize>,

    /// Training epochs of the recurrent model
    #[arg(long)]
    epochs: Option<usize>,

    /// Weight initialization seed
    #[arg(long)]
    seed: Option<u64>,

    /// Only forecast this measurement (repeatable)
    #[arg(long = "measurement")]
    measurements: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn pipeline_config(&self) -> wind_forecast::error::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        if let Some(lookback) = self.lookback {
            config.lstm.lookback = lookback;
        }
        if let Some(epochs) = self.epochs {
            config.lstm.epochs = epochs;
        }
        if let Some(seed) = self.seed {
            config.lstm.seed = seed;
        }
        if !self.measurements.is_empty() {
            config.measurements = Some(self.measurements.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = args.pipeline_config()?;

    let dataset = DataLoader::from_path(&config.data_path)?;
    tracing::info!(
        path = %config.data_path.display(),
        measurements = dataset.len(),
        "loaded observations"
    );

    let report = pipeline::run(&dataset, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }

    Ok(())
}
