use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use wind_forecast::config::{
    FetchConfig, LstmConfig, PipelineConfig, STATION_LATITUDE, STATION_LONGITUDE,
};
use wind_forecast::ForecastError;

#[test]
fn test_lstm_defaults() {
    let config = LstmConfig::default();

    assert_eq!(config.hidden_size, 8);
    assert_eq!(config.lookback, 24);
    assert_eq!(config.epochs, 10);
    assert_eq!(config.learning_rate, 0.01);
    assert!(config.validate().is_ok());
}

#[test]
fn test_lstm_builders() {
    let config = LstmConfig::default()
        .with_hidden_size(4)
        .with_lookback(12)
        .with_epochs(3)
        .with_learning_rate(0.05)
        .with_seed(7);

    assert_eq!(
        config,
        LstmConfig {
            hidden_size: 4,
            lookback: 12,
            epochs: 3,
            learning_rate: 0.05,
            seed: 7,
        }
    );
}

#[rstest]
#[case::zero_hidden(LstmConfig::default().with_hidden_size(0))]
#[case::zero_lookback(LstmConfig::default().with_lookback(0))]
#[case::zero_rate(LstmConfig::default().with_learning_rate(0.0))]
#[case::negative_rate(LstmConfig::default().with_learning_rate(-0.1))]
#[case::nan_rate(LstmConfig::default().with_learning_rate(f64::NAN))]
fn test_lstm_validation_rejects(#[case] config: LstmConfig) {
    assert!(matches!(
        config.validate(),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_zero_epochs_is_valid() {
    assert!(LstmConfig::default().with_epochs(0).validate().is_ok());
}

#[test]
fn test_pipeline_defaults() {
    let config = PipelineConfig::default();

    assert_eq!(config.data_path, PathBuf::from("data/data.csv"));
    assert_eq!(config.quantiles, vec![0.25, 0.5, 0.75]);
    assert_eq!(config.measurements, None);
    assert_eq!(config.lstm, LstmConfig::default());
}

#[test]
fn test_pipeline_includes() {
    let mut config = PipelineConfig::default();
    assert!(config.includes("wind_speed"));
    assert!(config.includes("cape"));

    config.measurements = Some(vec!["wind_speed".to_string()]);
    assert!(config.includes("wind_speed"));
    assert!(!config.includes("cape"));
}

#[rstest]
#[case(vec![0.0])]
#[case(vec![0.5, 1.0])]
#[case(vec![1.5])]
#[case::below_first_percentile(vec![0.25, 0.005])]
fn test_pipeline_rejects_out_of_range_quantiles(#[case] quantiles: Vec<f64>) {
    let config = PipelineConfig {
        quantiles,
        ..PipelineConfig::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_pipeline_from_json_file_rejects_unusable_quantile() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pipeline.json");
    fs::write(&path, r#"{"quantiles": [0.005]}"#).unwrap();

    let result = PipelineConfig::from_json_file(&path);

    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_pipeline_from_json_file_fills_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pipeline.json");
    fs::write(
        &path,
        r#"{"data_path": "obs.parquet", "measurements": ["wind_speed"], "lstm": {"lookback": 6}}"#,
    )
    .unwrap();

    let config = PipelineConfig::from_json_file(&path).unwrap();

    assert_eq!(config.data_path, PathBuf::from("obs.parquet"));
    assert_eq!(config.measurements, Some(vec!["wind_speed".to_string()]));
    assert_eq!(config.quantiles, vec![0.25, 0.5, 0.75]);
    assert_eq!(config.lstm, LstmConfig::default().with_lookback(6));
}

#[test]
fn test_pipeline_from_json_file_validates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pipeline.json");
    fs::write(&path, r#"{"lstm": {"hidden_size": 0}}"#).unwrap();

    let result = PipelineConfig::from_json_file(&path);

    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_pipeline_from_json_file_errors() {
    let dir = tempdir().unwrap();

    let missing = PipelineConfig::from_json_file(dir.path().join("absent.json"));
    assert!(matches!(missing, Err(ForecastError::IoError(_))));

    let path = dir.path().join("broken.json");
    fs::write(&path, "{ lookback = 6 }").unwrap();
    let broken = PipelineConfig::from_json_file(&path);
    assert!(matches!(broken, Err(ForecastError::JsonError(_))));
}

#[test]
fn test_fetch_defaults() {
    let config = FetchConfig::default();

    assert_eq!(config.latitude, STATION_LATITUDE);
    assert_eq!(config.longitude, STATION_LONGITUDE);
    assert_eq!(config.start, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    assert_eq!(config.meteostat_station, "LGSR");
    assert_eq!(config.meteostat_api_key, None);
    assert_eq!(config.windy_api_key, None);
}

#[test]
fn test_fetch_with_range() {
    let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();

    let config = FetchConfig::default().with_range(start, end);

    assert_eq!((config.start, config.end), (start, end));
}
