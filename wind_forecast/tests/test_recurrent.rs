use rstest::rstest;
use wind_forecast::config::LstmConfig;
use wind_forecast::models::{RecurrentForecastUnit, SeriesForecaster};

fn wind_series(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 6.0 + 2.0 * (i as f64 / 24.0 * std::f64::consts::TAU).sin())
        .collect()
}

fn default_unit() -> RecurrentForecastUnit {
    RecurrentForecastUnit::new(LstmConfig::default()).unwrap()
}

#[rstest]
#[case::empty(vec![], 0.0)]
#[case::single(vec![3.25], 3.25)]
#[case::two_values(vec![5.0, 7.0], 7.0)]
#[case::one_short(wind_series(23), wind_series(23)[22])]
fn test_short_series_falls_back_to_last_value(#[case] series: Vec<f64>, #[case] expected: f64) {
    let mut unit = default_unit();

    assert_eq!(unit.forecast(&series, 24), expected);

    // Prior training on a long series does not change the fallback
    unit.train(&wind_series(100), 3, 24);
    assert_eq!(unit.forecast(&series, 24), expected);
}

#[test]
fn test_empty_series_forecast_is_zero() {
    let mut unit = default_unit();
    unit.train(&[], 10, 24);

    let forecast = unit.forecast(&[], 24);
    assert_eq!(forecast, 0.0);
    assert!(forecast.is_sign_positive());
}

#[test]
fn test_two_value_series_scenario() {
    let mut unit = default_unit();
    let series = [5.0, 7.0];

    unit.train(&series, 10, 24);

    assert_eq!(unit.forecast(&series, 24), 7.0);
}

#[test]
fn test_oversized_lookback_falls_back() {
    let mut unit = default_unit();
    let series = wind_series(30);

    unit.train(&series, 3, usize::MAX);

    assert_eq!(unit.forecast(&series, usize::MAX), series[29]);
}

#[test]
fn test_forecast_is_repeatable() {
    let mut unit = default_unit();
    let series = wind_series(60);
    unit.train(&series, 2, 24);

    let first = unit.forecast(&series, 24);
    let second = unit.forecast(&series, 24);

    assert_eq!(first.to_bits(), second.to_bits());
}

#[test]
fn test_training_is_deterministic_for_a_seed() {
    let config = LstmConfig::default().with_seed(1234);
    let series = wind_series(80);

    let run = || {
        let mut unit = RecurrentForecastUnit::new(config).unwrap();
        unit.train(&series, 5, 24);
        unit.forecast(&series, 24)
    };

    assert_eq!(run().to_bits(), run().to_bits());
}

#[cfg(feature = "ndarray")]
#[test]
fn test_exact_window_length_uses_the_cell() {
    // With exactly `lookback` values there is no training example, but
    // inference still folds the window
    let unit = default_unit();
    let series = wind_series(24);

    let forecast = unit.forecast(&series, 24);

    assert!(forecast.is_finite());
    assert_ne!(forecast, series[23]);
}

#[cfg(feature = "ndarray")]
#[test]
fn test_constant_series_scenario() {
    let series = vec![1.0; 30];
    let config = LstmConfig::default().with_epochs(1);

    let mut unit = RecurrentForecastUnit::new(config).unwrap();
    let before = unit.forecast(&series, 24);
    unit.train(&series, 1, 24);
    let after = unit.forecast(&series, 24);

    assert!(after.is_finite());
    // Every example shares the same window and target, so each step shrinks the error
    assert!((after - 1.0).abs() < (before - 1.0).abs());

    let mut again = RecurrentForecastUnit::new(config).unwrap();
    again.train(&series, 1, 24);
    assert_eq!(again.forecast(&series, 24).to_bits(), after.to_bits());
}

#[cfg(feature = "ndarray")]
#[test]
fn test_more_epochs_fit_constant_series_better() {
    let series = vec![1.0; 30];

    let error_after = |epochs: usize| {
        let mut unit = default_unit();
        unit.train(&series, epochs, 24);
        (unit.forecast(&series, 24) - 1.0).abs()
    };

    assert!(error_after(50) < error_after(1));
}

#[test]
fn test_fit_forecast_uses_configured_window() {
    let config = LstmConfig::default().with_lookback(6).with_epochs(2);
    let series = wind_series(40);

    let mut via_trait = RecurrentForecastUnit::new(config).unwrap();
    let value = via_trait.fit_forecast(&series).unwrap();

    let mut direct = RecurrentForecastUnit::new(config).unwrap();
    direct.train(&series, 2, 6);

    assert_eq!(value.to_bits(), direct.forecast(&series, 6).to_bits());
    assert!(via_trait.name().contains("lookback=6"));
}

#[test]
fn test_fallback_only_unit_ignores_history() {
    let mut unit = RecurrentForecastUnit::fallback_only(LstmConfig::default()).unwrap();
    let series = wind_series(50);

    unit.train(&series, 10, 24);

    assert!(!unit.has_numeric_backend());
    assert_eq!(unit.forecast(&series, 24), series[49]);
    assert_eq!(unit.forecast(&[], 24), 0.0);
}

#[cfg(feature = "ndarray")]
mod weights {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    #[case::empty(vec![])]
    #[case::two_values(vec![5.0, 7.0])]
    #[case::exactly_lookback(wind_series(24))]
    fn test_short_series_leaves_weights_unchanged(#[case] series: Vec<f64>) {
        let mut unit = default_unit();
        let before = unit.weights().cloned();

        unit.train(&series, 10, 24);

        assert_eq!(unit.weights().cloned(), before);
    }

    #[test]
    fn test_oversized_lookback_leaves_weights_unchanged() {
        let mut unit = default_unit();
        let before = unit.weights().cloned();

        unit.train(&wind_series(72), 10, usize::MAX);

        assert_eq!(unit.weights().cloned(), before);
    }

    #[test]
    fn test_training_only_moves_projection() {
        let mut unit = default_unit();
        let before = unit.weights().cloned().unwrap();

        unit.train(&wind_series(72), 3, 24);

        let after = unit.weights().unwrap();
        assert_eq!(after.forget(), before.forget());
        assert_eq!(after.input(), before.input());
        assert_eq!(after.candidate(), before.candidate());
        assert_eq!(after.output(), before.output());
        assert!(after.projection() != before.projection());
    }

    #[test]
    fn test_zero_epochs_is_a_no_op() {
        let mut unit = default_unit();
        let before = unit.weights().cloned();

        unit.train(&wind_series(72), 0, 24);

        assert_eq!(unit.weights().cloned(), before);
    }

    #[test]
    fn test_seed_controls_initial_weights() {
        let a = RecurrentForecastUnit::new(LstmConfig::default().with_seed(1)).unwrap();
        let b = RecurrentForecastUnit::new(LstmConfig::default().with_seed(1)).unwrap();
        let c = RecurrentForecastUnit::new(LstmConfig::default().with_seed(2)).unwrap();

        assert_eq!(a.weights(), b.weights());
        assert!(a.weights() != c.weights());
    }

    #[test]
    fn test_hidden_size_shapes_weights() {
        let unit = RecurrentForecastUnit::new(LstmConfig::default().with_hidden_size(3)).unwrap();
        let weights = unit.weights().unwrap();

        assert_eq!(weights.forget().dim(), (4, 3));
        assert_eq!(weights.projection().len(), 3);
    }
}
