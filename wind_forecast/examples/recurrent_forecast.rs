use wind_forecast::config::LstmConfig;
use wind_forecast::models::{
    ensemble, ForecastMap, MeanModel, QuantileModel, RecurrentForecastUnit, SeriesForecaster,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Wind Forecast: Recurrent Forecast Example");
    println!("=========================================\n");

    // Three days of hourly wind speed with a daily cycle
    let wind_speed: Vec<f64> = (0..72)
        .map(|hour| {
            let phase = hour as f64 / 24.0 * std::f64::consts::TAU;
            6.0 + 2.5 * phase.sin() + 0.3 * (hour as f64 * 0.7).cos()
        })
        .collect();
    println!("Sample series created: {} hourly points\n", wind_speed.len());

    let config = LstmConfig::default().with_epochs(20);
    let mut unit = RecurrentForecastUnit::new(config)?;

    let before = unit.forecast(&wind_speed, config.lookback);
    unit.train(&wind_speed, config.epochs, config.lookback);
    let after = unit.forecast(&wind_speed, config.lookback);

    println!("{}", unit.name());
    println!("  Forecast before training: {:.4}", before);
    println!("  Forecast after training:  {:.4}", after);

    // Not enough history for one window: the last value is used
    let short = &wind_speed[..5];
    println!(
        "  Forecast from {} points (fallback): {:.4}\n",
        short.len(),
        unit.forecast(short, config.lookback)
    );

    // Companion forecasts and their ensemble
    let mean = MeanModel::new().fit_forecast(&wind_speed)?;
    let median = QuantileModel::new(0.5)?.fit_forecast(&wind_speed)?;

    let single = |value: f64| -> ForecastMap {
        std::iter::once(("wind_speed".to_string(), value)).collect()
    };
    let combined = ensemble(&single(mean), &[&single(median), &single(after)]);

    println!("Companion forecasts:");
    println!("  Mean:     {:.4}", mean);
    println!("  Median:   {:.4}", median);
    println!("  Ensemble: {:.4}", combined["wind_speed"]);

    Ok(())
}
