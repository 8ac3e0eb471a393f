//! Descriptive statistics used as companion forecasts
//!
//! - Arithmetic mean
//! - Exclusive-method quantile cut points
//! - Single percentile lookup on the 100-quantile grid

use crate::{MathError, Result};
use statrs::statistics::Statistics;

/// Arithmetic mean of a series
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Mean requires at least one data point".to_string(),
        ));
    }

    Ok(values.iter().mean())
}

/// Divide `values` into `n` equal-probability intervals and return the
/// `n - 1` cut points.
///
/// Uses the exclusive method: the sample is treated as drawn from a
/// population that may hold values more extreme than those observed, so
/// cut points are interpolated at positions `i * (len + 1) / n` and
/// extrapolated near the edges.
pub fn quantiles(values: &[f64], n: usize) -> Result<Vec<f64>> {
    if n < 1 {
        return Err(MathError::InvalidInput(
            "Number of quantile intervals must be at least 1".to_string(),
        ));
    }
    if values.len() < 2 {
        return Err(MathError::InsufficientData(
            "Quantiles require at least two data points".to_string(),
        ));
    }

    let mut data = values.to_vec();
    data.sort_by(|a, b| a.total_cmp(b));

    let len = data.len() as i64;
    let n = n as i64;
    let m = len + 1;

    let cut_points = (1..n)
        .map(|i| {
            let j = (i * m / n).clamp(1, len - 1);
            // Exact integer offset between position i*m/n and j
            let delta = i * m - j * n;
            let lower = data[(j - 1) as usize];
            let upper = data[j as usize];
            (lower * (n - delta) as f64 + upper * delta as f64) / n as f64
        })
        .collect();

    Ok(cut_points)
}

/// Value at probability `q` on the 100-quantile grid.
///
/// `q` is truncated to a whole percentile, which must fall in `1..=99`.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if !q.is_finite() {
        return Err(MathError::InvalidInput(format!(
            "Quantile probability must be finite, got {}",
            q
        )));
    }

    let percentile = (q * 100.0) as i64;
    if !(1..=99).contains(&percentile) {
        return Err(MathError::InvalidInput(format!(
            "Quantile probability {} does not map to a percentile in 1..=99",
            q
        )));
    }

    let cut_points = quantiles(values, 100)?;
    cut_points
        .get((percentile - 1) as usize)
        .copied()
        .ok_or_else(|| {
            MathError::CalculationError(format!("No cut point for percentile {}", percentile))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        assert_relative_eq!(mean(&[2.0, 4.0, 6.0, 8.0]).unwrap(), 5.0);
        assert_eq!(mean(&[3.5]).unwrap(), 3.5);
        assert!(matches!(mean(&[]), Err(MathError::InsufficientData(_))));
    }

    #[test]
    fn test_quartiles_exclusive() {
        let data: Vec<f64> = (1..=10).map(f64::from).collect();
        let q = quantiles(&data, 4).unwrap();

        assert_eq!(q.len(), 3);
        assert_relative_eq!(q[0], 2.75);
        assert_relative_eq!(q[1], 5.5);
        assert_relative_eq!(q[2], 8.25);
    }

    #[test]
    fn test_quantiles_ignore_input_order() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        let shuffled = [4.0, 1.0, 5.0, 3.0, 2.0];

        assert_eq!(
            quantiles(&sorted, 10).unwrap(),
            quantiles(&shuffled, 10).unwrap()
        );
    }

    #[test]
    fn test_quantiles_single_interval() {
        assert!(quantiles(&[1.0, 2.0], 1).unwrap().is_empty());
    }

    #[test]
    fn test_quantiles_extrapolate_small_samples() {
        // Four points on the percentile grid: the first cut point lies below the minimum
        let q = quantiles(&[1.0, 2.0, 3.0, 4.0], 100).unwrap();
        assert_eq!(q.len(), 99);
        assert!(q[0] < 1.0);
        assert!(q[98] > 4.0);
    }

    #[test]
    fn test_quantiles_invalid_input() {
        assert!(matches!(
            quantiles(&[1.0, 2.0], 0),
            Err(MathError::InvalidInput(_))
        ));
        assert!(matches!(
            quantiles(&[1.0], 4),
            Err(MathError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_quantile_median() {
        let data: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_relative_eq!(quantile(&data, 0.5).unwrap(), 5.5);
    }

    #[test]
    fn test_quantile_quartiles_ordered() {
        let data = [7.0, 1.0, 9.0, 4.0, 3.0, 8.0, 2.0, 6.0];
        let q25 = quantile(&data, 0.25).unwrap();
        let q50 = quantile(&data, 0.5).unwrap();
        let q75 = quantile(&data, 0.75).unwrap();

        assert!(q25 < q50);
        assert!(q50 < q75);
    }

    #[test]
    fn test_quantile_out_of_range() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert!(quantile(&data, 0.0).is_err());
        assert!(quantile(&data, 1.0).is_err());
        assert!(quantile(&data, f64::NAN).is_err());
    }
}
