//! Closed-form companion forecasts

use crate::error::{ForecastError, Result};
use crate::models::SeriesForecaster;
use wind_math::{mean, quantile};

/// Fewest observations a quantile forecast is made from
pub const MIN_QUANTILE_OBSERVATIONS: usize = 4;

/// Forecasts the series mean
#[derive(Debug, Clone)]
pub struct MeanModel {
    /// Name of the model
    name: String,
}

impl MeanModel {
    pub fn new() -> Self {
        Self {
            name: "Deterministic (mean)".to_string(),
        }
    }
}

impl Default for MeanModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesForecaster for MeanModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn fit_forecast(&mut self, series: &[f64]) -> Result<f64> {
        Ok(mean(series)?)
    }
}

/// Forecasts a fixed quantile of the series
#[derive(Debug, Clone)]
pub struct QuantileModel {
    /// Name of the model
    name: String,
    /// Probability level
    q: f64,
}

impl QuantileModel {
    /// Create a new quantile model
    ///
    /// `q` is truncated to a whole percentile, which must fall in `1..=99`.
    pub fn new(q: f64) -> Result<Self> {
        let percentile = (q * 100.0) as i64;
        if !q.is_finite() || !(1..=99).contains(&percentile) {
            return Err(ForecastError::InvalidParameter(format!(
                "Quantile {} must map to a percentile between 1 and 99",
                q
            )));
        }

        Ok(Self {
            name: format!("Quantile (q={})", q),
            q,
        })
    }

    pub fn q(&self) -> f64 {
        self.q
    }
}

impl SeriesForecaster for QuantileModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn fit_forecast(&mut self, series: &[f64]) -> Result<f64> {
        if series.len() < MIN_QUANTILE_OBSERVATIONS {
            return Err(ForecastError::DataError(format!(
                "Quantile forecast needs at least {} observations, got {}",
                MIN_QUANTILE_OBSERVATIONS,
                series.len()
            )));
        }

        Ok(quantile(series, self.q)?)
    }
}
