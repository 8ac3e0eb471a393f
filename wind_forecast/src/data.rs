//! Weather observations and their tabular storage
//!
//! Observations are written as CSV rows (or a Parquet table) with the
//! columns in [`DATA_COLUMNS`], and loaded back as one numeric series per
//! measurement column.

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::Path;

/// Column layout of the observation table
pub const DATA_COLUMNS: [&str; 12] = [
    "time",
    "wind_speed",
    "wind_dir",
    "temp",
    "pressure",
    "humidity",
    "lclouds",
    "mclouds",
    "hclouds",
    "precip",
    "cape",
    "source",
];

/// Columns that carry no measurement
const NON_MEASUREMENT_COLUMNS: [&str; 2] = ["time", "source"];

/// One observation row from a weather provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Timestamp as reported by the provider
    pub time: String,
    /// Wind speed
    pub wind_speed: Option<f64>,
    /// Wind direction in degrees
    pub wind_dir: Option<f64>,
    /// Air temperature
    pub temp: Option<f64>,
    /// Sea-level pressure
    pub pressure: Option<f64>,
    /// Relative humidity
    pub humidity: Option<f64>,
    /// Low cloud cover
    pub lclouds: Option<f64>,
    /// Mid cloud cover
    pub mclouds: Option<f64>,
    /// High cloud cover
    pub hclouds: Option<f64>,
    /// Precipitation
    pub precip: Option<f64>,
    /// Convective available potential energy
    pub cape: Option<f64>,
    /// Provider tag
    pub source: String,
}

impl Observation {
    /// Create an observation with no measurements
    pub fn new(time: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            source: source.into(),
            ..Self::default()
        }
    }
}

/// Writer for observation tables
#[derive(Debug)]
pub struct ObservationStore;

impl ObservationStore {
    /// Write observations to a CSV file with a header row
    ///
    /// Missing measurements are written as empty cells.
    pub fn write_csv<P: AsRef<Path>>(rows: &[Observation], path: P) -> Result<()> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;

        let mut writer = csv::Writer::from_path(path)?;
        if rows.is_empty() {
            // serialize() only emits the header alongside the first row
            writer.write_record(DATA_COLUMNS)?;
        }
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Write observations to a Parquet file
    pub fn write_parquet<P: AsRef<Path>>(rows: &[Observation], path: P) -> Result<()> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;

        let mut df = Self::to_dataframe(rows)?;
        let file = File::create(path)?;
        ParquetWriter::new(file).finish(&mut df)?;

        Ok(())
    }

    /// Arrange observations as a DataFrame with the [`DATA_COLUMNS`] layout
    pub fn to_dataframe(rows: &[Observation]) -> Result<DataFrame> {
        let measurement = |name: &str, get: fn(&Observation) -> Option<f64>| {
            Series::new(name, rows.iter().map(get).collect::<Vec<Option<f64>>>())
        };

        let times: Vec<&str> = rows.iter().map(|r| r.time.as_str()).collect();
        let sources: Vec<&str> = rows.iter().map(|r| r.source.as_str()).collect();

        let df = DataFrame::new(vec![
            Series::new("time", times),
            measurement("wind_speed", |r| r.wind_speed),
            measurement("wind_dir", |r| r.wind_dir),
            measurement("temp", |r| r.temp),
            measurement("pressure", |r| r.pressure),
            measurement("humidity", |r| r.humidity),
            measurement("lclouds", |r| r.lclouds),
            measurement("mclouds", |r| r.mclouds),
            measurement("hclouds", |r| r.hclouds),
            measurement("precip", |r| r.precip),
            measurement("cape", |r| r.cape),
            Series::new("source", sources),
        ])?;

        Ok(df)
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Numeric series keyed by measurement name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherDataset {
    columns: BTreeMap<String, Vec<f64>>,
}

/// Data loader for observation tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a dataset from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<WeatherDataset> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Load a dataset from a Parquet file
    pub fn from_parquet<P: AsRef<Path>>(path: P) -> Result<WeatherDataset> {
        let file = File::open(path)?;
        let df = ParquetReader::new(file).finish()?;

        Self::from_dataframe(df)
    }

    /// Load a dataset, reading `.parquet` files as Parquet and anything else as CSV
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<WeatherDataset> {
        let path = path.as_ref();
        let is_parquet = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));

        if is_parquet {
            Self::from_parquet(path)
        } else {
            Self::from_csv(path)
        }
    }

    /// Extract every measurement column of a DataFrame
    ///
    /// Cells that are missing or do not hold a finite number are dropped,
    /// so series keep their order but may be shorter than the table.
    pub fn from_dataframe(df: DataFrame) -> Result<WeatherDataset> {
        let mut columns = BTreeMap::new();

        for column in df.get_columns() {
            let name = column.name();
            if NON_MEASUREMENT_COLUMNS.contains(&name) {
                continue;
            }
            columns.insert(name.to_string(), Self::numeric_values(column)?);
        }

        Ok(WeatherDataset { columns })
    }

    fn numeric_values(column: &Series) -> Result<Vec<f64>> {
        let values: Vec<f64> = match column.dtype() {
            DataType::Utf8 => column
                .utf8()?
                .into_iter()
                .flatten()
                .filter_map(|cell| cell.trim().parse::<f64>().ok())
                .collect(),
            _ => column
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .flatten()
                .collect(),
        };

        Ok(values.into_iter().filter(|v| v.is_finite()).collect())
    }
}

impl WeatherDataset {
    pub fn new(columns: BTreeMap<String, Vec<f64>>) -> Self {
        Self { columns }
    }

    /// Values of one measurement, in table order
    pub fn series(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Measurement names in sorted order
    pub fn measurements(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Iterate over `(measurement, values)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Add or replace a measurement
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.columns.insert(name.into(), values);
    }

    /// Keep only the named measurements
    pub fn retain(&mut self, names: &[String]) {
        self.columns.retain(|name, _| names.contains(name));
    }

    /// Number of measurements
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<(String, Vec<f64>)> for WeatherDataset {
    fn from_iter<I: IntoIterator<Item = (String, Vec<f64>)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
