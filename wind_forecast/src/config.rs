//! Configuration for the recurrent forecaster, the training pipeline and
//! provider fetching

use crate::error::{ForecastError, Result};
use crate::models::QuantileModel;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Hyperparameters of the recurrent forecast unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LstmConfig {
    /// Width of the hidden and cell state vectors
    pub hidden_size: usize,
    /// Window length folded into the state per example
    pub lookback: usize,
    /// Passes over the training examples
    pub epochs: usize,
    /// Step size of the read-out update
    pub learning_rate: f64,
    /// Seed for weight initialization
    pub seed: u64,
}

impl Default for LstmConfig {
    fn default() -> Self {
        Self {
            hidden_size: 8,
            lookback: 24,
            epochs: 10,
            learning_rate: 0.01,
            seed: 42,
        }
    }
}

impl LstmConfig {
    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = hidden_size;
        self
    }

    pub fn with_lookback(mut self, lookback: usize) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check that every hyperparameter is usable
    pub fn validate(&self) -> Result<()> {
        if self.hidden_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "Hidden size must be greater than zero".to_string(),
            ));
        }

        if self.lookback == 0 {
            return Err(ForecastError::InvalidParameter(
                "Lookback must be greater than zero".to_string(),
            ));
        }

        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Learning rate must be a positive number, got {}",
                self.learning_rate
            )));
        }

        Ok(())
    }
}

/// Settings for the `train_models` pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Observation table to load
    pub data_path: PathBuf,
    /// Probabilities of the quantile companion forecasts
    pub quantiles: Vec<f64>,
    /// Restrict forecasting to these measurements (all when `None`)
    pub measurements: Option<Vec<String>>,
    /// Recurrent unit hyperparameters
    pub lstm: LstmConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/data.csv"),
            quantiles: vec![0.25, 0.5, 0.75],
            measurements: None,
            lstm: LstmConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a pipeline configuration from a JSON file; missing keys take defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Whether `measurement` is selected for forecasting
    pub fn includes(&self, measurement: &str) -> bool {
        self.measurements
            .as_ref()
            .map_or(true, |names| names.iter().any(|name| name == measurement))
    }

    pub fn validate(&self) -> Result<()> {
        self.lstm.validate()?;

        for &q in &self.quantiles {
            QuantileModel::new(q)?;
        }

        Ok(())
    }
}

/// Santorini Monolithos station latitude
pub const STATION_LATITUDE: f64 = 36.401;
/// Santorini Monolithos station longitude
pub const STATION_LONGITUDE: f64 = 25.479;

/// Settings for fetching observations from weather providers
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// First day to fetch (inclusive)
    pub start: NaiveDate,
    /// Last day to fetch (inclusive)
    pub end: NaiveDate,
    /// Meteostat station identifier
    pub meteostat_station: String,
    pub meteostat_api_key: Option<String>,
    pub windy_api_key: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            latitude: STATION_LATITUDE,
            longitude: STATION_LONGITUDE,
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            end: Utc::now().date_naive(),
            meteostat_station: "LGSR".to_string(),
            meteostat_api_key: None,
            windy_api_key: None,
        }
    }
}

impl FetchConfig {
    /// Defaults with station and API keys taken from the environment
    ///
    /// Reads `METEOSTAT_API_KEY`, `METEOSTAT_STATION` and `WINDY_API_KEY`.
    /// Empty variables count as unset.
    pub fn from_env() -> Self {
        let non_empty = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            meteostat_station: non_empty("METEOSTAT_STATION")
                .unwrap_or_else(|| defaults.meteostat_station.clone()),
            meteostat_api_key: non_empty("METEOSTAT_API_KEY"),
            windy_api_key: non_empty("WINDY_API_KEY"),
            ..defaults
        }
    }

    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = start;
        self.end = end;
        self
    }
}
