//! # Monolithos
//!
//! `monolithos` bundles the wind forecasting crates for the Santorini
//! Monolithos station.
//!
//! - [`wind_forecast`]: observation fetching and storage, the recurrent
//!   forecaster, companion models and the training pipeline
//! - [`wind_math`]: activation functions and descriptive statistics
//!
//! ## Example
//!
//! ```
//! use monolithos::wind_forecast::LstmConfig;
//! use monolithos::wind_forecast::RecurrentForecastUnit;
//!
//! let unit = RecurrentForecastUnit::new(LstmConfig::default()).unwrap();
//! assert_eq!(unit.forecast(&[4.0, 4.5], 24), 4.5);
//! ```

pub use wind_forecast;
pub use wind_math;
