//! # Wind Forecast
//!
//! Next-value forecasting for weather measurement series collected at the
//! Santorini Monolithos station.
//!
//! ## Features
//!
//! - Observation collection from Open-Meteo, Meteostat, Windy and Weather Underground
//! - Observation tables in CSV or Parquet, loaded as one series per measurement
//! - A single-cell recurrent forecaster trained on its read-out layer
//! - Mean and quantile companion forecasts
//! - Ensemble averaging across models
//!
//! ## Recurrent forecaster
//!
//! The [`RecurrentForecastUnit`] folds a window of recent values through one
//! LSTM-style cell. Training only adjusts the projection from the hidden
//! state to the forecast; the gate weights keep their seeded values. When the
//! series is too short, or the crate is built without the `ndarray` feature,
//! the forecast is the last observed value (zero for an empty series).
//!
//! ## Quick Start
//!
//! ```rust
//! use wind_forecast::config::LstmConfig;
//! use wind_forecast::models::RecurrentForecastUnit;
//!
//! let config = LstmConfig::default().with_lookback(6).with_epochs(3);
//! let mut unit = RecurrentForecastUnit::new(config)?;
//!
//! let wind_speed: Vec<f64> = (0..48).map(|h| 5.0 + (h as f64 / 4.0).sin()).collect();
//! unit.train(&wind_speed, 3, 6);
//!
//! let next = unit.forecast(&wind_speed, 6);
//! assert!(next.is_finite());
//!
//! // Too little history: the last value is returned
//! assert_eq!(unit.forecast(&[5.0, 7.0], 24), 7.0);
//! # Ok::<(), wind_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod fetch;
pub mod models;
pub mod pipeline;

// Re-export commonly used types
pub use crate::config::{FetchConfig, LstmConfig, PipelineConfig};
pub use crate::data::{DataLoader, Observation, ObservationStore, WeatherDataset};
pub use crate::error::ForecastError;
pub use crate::models::{RecurrentForecastUnit, SeriesForecaster};
pub use crate::pipeline::ForecastReport;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
