//! Forecasting models for measurement series

use crate::error::Result;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Next-value forecasts keyed by measurement name
pub type ForecastMap = BTreeMap<String, f64>;

/// A model that can be fitted to a series and forecast its next value
pub trait SeriesForecaster: Debug {
    /// Name of the model
    fn name(&self) -> &str;

    /// Fit the model to `series` and forecast the value that follows it
    fn fit_forecast(&mut self, series: &[f64]) -> Result<f64>;
}

pub mod ensemble;
#[cfg(feature = "ndarray")]
pub mod lstm_cell;
pub mod recurrent;
pub mod statistical;

pub use ensemble::ensemble;
pub use recurrent::{LastObserved, RecurrentForecastUnit};
pub use statistical::{MeanModel, QuantileModel};
