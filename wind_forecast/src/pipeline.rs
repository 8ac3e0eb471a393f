//! Forecast every measurement of a dataset with the mean, quantile and
//! recurrent models, then combine them into an ensemble

use crate::config::PipelineConfig;
use crate::data::WeatherDataset;
use crate::error::Result;
use crate::models::{
    ensemble, ForecastMap, MeanModel, QuantileModel, RecurrentForecastUnit, SeriesForecaster,
};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Quantile forecasts at one probability level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantileForecast {
    pub q: f64,
    pub values: ForecastMap,
}

/// Forecasts of every model for every selected measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    /// Mean forecasts
    pub deterministic: ForecastMap,
    /// One entry per configured quantile
    pub quantiles: Vec<QuantileForecast>,
    /// Recurrent unit forecasts
    pub recurrent: ForecastMap,
    /// Average of the deterministic, quantile and recurrent forecasts
    pub ensemble: ForecastMap,
}

impl ForecastReport {
    /// Quantile forecasts for probability `q`, if configured
    pub fn quantile(&self, q: f64) -> Option<&ForecastMap> {
        self.quantiles
            .iter()
            .find(|forecast| forecast.q == q)
            .map(|forecast| &forecast.values)
    }
}

/// Run every model over the selected measurements of `dataset`.
///
/// Empty series are skipped. A model that cannot forecast a series (for
/// example a quantile model on fewer than four observations) leaves that
/// measurement out of its map; the ensemble then uses the mean in its place.
pub fn run(dataset: &WeatherDataset, config: &PipelineConfig) -> Result<ForecastReport> {
    config.validate()?;

    if let Some(names) = &config.measurements {
        for name in names {
            if dataset.series(name).is_none() {
                warn!(measurement = %name, "requested measurement not in dataset");
            }
        }
    }

    info!(measurements = dataset.len(), "running forecast models");

    let deterministic = forecast_each(dataset, config, || Ok(MeanModel::new()))?;

    let quantiles = config
        .quantiles
        .iter()
        .map(|&q| {
            let values = forecast_each(dataset, config, || QuantileModel::new(q))?;
            Ok(QuantileForecast { q, values })
        })
        .collect::<Result<Vec<_>>>()?;

    let recurrent = forecast_each(dataset, config, || {
        RecurrentForecastUnit::new(config.lstm)
    })?;

    let members: Vec<&ForecastMap> = quantiles
        .iter()
        .map(|forecast| &forecast.values)
        .chain(std::iter::once(&recurrent))
        .collect();
    let ensemble = ensemble(&deterministic, &members);

    info!(forecasts = ensemble.len(), "forecast models finished");

    Ok(ForecastReport {
        deterministic,
        quantiles,
        recurrent,
        ensemble,
    })
}

/// Fit a fresh model per measurement and collect the forecasts it can make
fn forecast_each<M, F>(
    dataset: &WeatherDataset,
    config: &PipelineConfig,
    mut make_model: F,
) -> Result<ForecastMap>
where
    M: SeriesForecaster,
    F: FnMut() -> Result<M>,
{
    let mut forecasts = ForecastMap::new();

    for (name, series) in dataset.iter() {
        if !config.includes(name) || series.is_empty() {
            continue;
        }

        let mut model = make_model()?;
        match model.fit_forecast(series) {
            Ok(value) => {
                forecasts.insert(name.to_string(), value);
            }
            Err(err) => {
                debug!(measurement = name, model = model.name(), %err, "no forecast");
            }
        }
    }

    Ok(forecasts)
}

fn write_map(f: &mut fmt::Formatter<'_>, title: &str, map: &ForecastMap) -> fmt::Result {
    writeln!(f, "{}:", title)?;
    if map.is_empty() {
        writeln!(f, "  (none)")?;
    }
    for (name, value) in map {
        writeln!(f, "  {:<12} {:.4}", name, value)?;
    }
    Ok(())
}

impl fmt::Display for ForecastReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_map(f, "Deterministic forecast", &self.deterministic)?;
        for forecast in &self.quantiles {
            write_map(
                f,
                &format!("Quantile {} forecast", forecast.q),
                &forecast.values,
            )?;
        }
        write_map(f, "LSTM forecast", &self.recurrent)?;
        write_map(f, "Ensemble forecast", &self.ensemble)
    }
}
