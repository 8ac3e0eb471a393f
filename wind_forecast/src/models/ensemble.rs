//! Ensemble of per-measurement forecasts

use crate::models::ForecastMap;

/// Average `base` with every member forecast, measurement by measurement.
///
/// The result has exactly the measurements of `base`. A member without a
/// forecast for a measurement contributes the base value in its place.
pub fn ensemble(base: &ForecastMap, members: &[&ForecastMap]) -> ForecastMap {
    let count = (members.len() + 1) as f64;

    base.iter()
        .map(|(name, &value)| {
            let total: f64 = std::iter::once(value)
                .chain(
                    members
                        .iter()
                        .map(|member| member.get(name).copied().unwrap_or(value)),
                )
                .sum();
            (name.clone(), total / count)
        })
        .collect()
}
