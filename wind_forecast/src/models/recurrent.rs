//! Recurrent next-value forecaster
//!
//! [`RecurrentForecastUnit`] folds the last `lookback` observations through a
//! single LSTM-style cell and projects the hidden state to a forecast. When
//! the dense backend is not compiled in, or the series is too short, it
//! answers with the last observed value instead.

use crate::config::LstmConfig;
use crate::error::Result;
#[cfg(feature = "ndarray")]
use crate::models::lstm_cell::{LstmCell, WeightSet};
use crate::models::SeriesForecaster;
use tracing::debug;

/// Forecast used whenever the recurrent path cannot run: the last observed
/// value, or zero for an empty series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LastObserved;

impl LastObserved {
    pub fn forecast(&self, series: &[f64]) -> f64 {
        series.last().copied().unwrap_or(0.0)
    }
}

/// Numeric capability resolved once at construction
#[derive(Debug, Clone)]
enum Engine {
    #[cfg(feature = "ndarray")]
    Dense(LstmCell),
    Fallback,
}

impl Engine {
    #[cfg(feature = "ndarray")]
    fn detect(config: &LstmConfig) -> Self {
        Engine::Dense(LstmCell::seeded(config.hidden_size, config.seed))
    }

    #[cfg(not(feature = "ndarray"))]
    fn detect(_config: &LstmConfig) -> Self {
        Engine::Fallback
    }
}

/// Single-cell recurrent forecaster trained on its read-out layer
#[derive(Debug, Clone)]
pub struct RecurrentForecastUnit {
    /// Name of the model
    name: String,
    /// Hyperparameters
    config: LstmConfig,
    engine: Engine,
    fallback: LastObserved,
}

impl RecurrentForecastUnit {
    /// Create a unit with seeded weights
    pub fn new(config: LstmConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            name: Self::model_name(&config),
            engine: Engine::detect(&config),
            config,
            fallback: LastObserved,
        })
    }

    /// Create a unit without the dense backend; it only ever serves the
    /// last-observed fallback
    pub fn fallback_only(config: LstmConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            name: Self::model_name(&config),
            engine: Engine::Fallback,
            config,
            fallback: LastObserved,
        })
    }

    fn model_name(config: &LstmConfig) -> String {
        format!(
            "LSTM (hidden={}, lookback={})",
            config.hidden_size, config.lookback
        )
    }

    pub fn config(&self) -> &LstmConfig {
        &self.config
    }

    /// Whether training and inference can use the recurrent cell
    pub fn has_numeric_backend(&self) -> bool {
        !matches!(self.engine, Engine::Fallback)
    }

    /// Current weights, if the dense backend is active
    #[cfg(feature = "ndarray")]
    pub fn weights(&self) -> Option<&WeightSet> {
        match &self.engine {
            Engine::Dense(cell) => Some(cell.weights()),
            Engine::Fallback => None,
        }
    }

    /// Train the read-out projection in place.
    ///
    /// Does nothing when the backend is unavailable or the series holds
    /// fewer than `lookback + 1` values.
    pub fn train(&mut self, series: &[f64], epochs: usize, lookback: usize) {
        match &mut self.engine {
            #[cfg(feature = "ndarray")]
            Engine::Dense(cell) => {
                if series.len() <= lookback {
                    debug!(
                        len = series.len(),
                        lookback, "series too short to train, keeping current weights"
                    );
                    return;
                }

                cell.fit_readout(series, epochs, lookback, self.config.learning_rate);
                debug!(
                    epochs,
                    examples = series.len() - lookback,
                    "trained read-out projection"
                );
            }
            Engine::Fallback => {
                debug!(
                    len = series.len(),
                    epochs, lookback, "numeric backend unavailable, training skipped"
                );
            }
        }
    }

    /// Forecast the value following `series`.
    ///
    /// Folds the final `lookback` values from a zero state; falls back to the
    /// last observed value (or zero) when that is not possible.
    #[cfg_attr(not(feature = "ndarray"), allow(unused_variables))]
    pub fn forecast(&self, series: &[f64], lookback: usize) -> f64 {
        match &self.engine {
            #[cfg(feature = "ndarray")]
            Engine::Dense(cell) if series.len() >= lookback => {
                cell.predict(&series[series.len() - lookback..])
            }
            _ => self.fallback.forecast(series),
        }
    }
}

impl SeriesForecaster for RecurrentForecastUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn fit_forecast(&mut self, series: &[f64]) -> Result<f64> {
        let LstmConfig {
            epochs, lookback, ..
        } = self.config;

        self.train(series, epochs, lookback);
        Ok(self.forecast(series, lookback))
    }
}
