//! Observation retrieval from external weather providers
//!
//! Every source swallows its own failures: a provider that cannot be reached
//! or answers with something unreadable is logged and contributes an empty
//! (or, for day-by-day sources, partial) batch of rows.
//!
//! Response decoding lives in the `parse_*` functions so it can be used
//! without network access.

use crate::config::FetchConfig;
use crate::data::Observation;
use crate::error::Result;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use regex::Regex;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{info, warn};

const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; monolithos/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const OPEN_METEO_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
const OPEN_METEO_HOURLY: &str = "windspeed_10m,winddirection_10m,temperature_2m,pressure_msl,\
relativehumidity_2m,cloudcover_low,cloudcover_mid,cloudcover_high,precipitation,cape";
const METEOSTAT_URL: &str = "https://api.meteostat.net/v2/stations/hourly";
const WINDY_URL: &str = "https://api.windy.com/api/point-forecast/v2";
const WUNDERGROUND_URL: &str = "https://www.wunderground.com/history/daily/gr/santorini/LGSR";

/// A provider of weather observations
pub trait WeatherSource {
    /// Provider name used in logs
    fn name(&self) -> &str;

    /// Fetch observations between `start` and `end` (inclusive).
    ///
    /// Never fails; provider errors are logged and yield fewer rows.
    fn fetch(&self, client: &Client, start: NaiveDate, end: NaiveDate) -> Vec<Observation>;
}

fn send_text(request: RequestBuilder) -> Result<String> {
    Ok(request.send()?.error_for_status()?.text()?)
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

/// Open-Meteo hourly archive
#[derive(Debug, Clone)]
pub struct OpenMeteo {
    latitude: f64,
    longitude: f64,
    base_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct OpenMeteoResponse {
    #[serde(default)]
    hourly: OpenMeteoHourly,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenMeteoHourly {
    time: Vec<String>,
    windspeed_10m: Vec<Option<f64>>,
    winddirection_10m: Vec<Option<f64>>,
    temperature_2m: Vec<Option<f64>>,
    pressure_msl: Vec<Option<f64>>,
    relativehumidity_2m: Vec<Option<f64>>,
    cloudcover_low: Vec<Option<f64>>,
    cloudcover_mid: Vec<Option<f64>>,
    cloudcover_high: Vec<Option<f64>>,
    precipitation: Vec<Option<f64>>,
    cape: Vec<Option<f64>>,
}

impl OpenMeteo {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            base_url: OPEN_METEO_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request URL for a single day
    pub fn day_url(&self, day: NaiveDate) -> String {
        format!(
            "{}?latitude={}&longitude={}&hourly={}&timezone=UTC&start_date={}&end_date={}",
            self.base_url, self.latitude, self.longitude, OPEN_METEO_HOURLY, day, day
        )
    }
}

/// Decode one Open-Meteo archive response into hourly rows
pub fn parse_open_meteo(body: &str) -> Result<Vec<Observation>> {
    let response: OpenMeteoResponse = serde_json::from_str(body)?;
    let hourly = response.hourly;

    let rows = hourly
        .time
        .iter()
        .enumerate()
        .map(|(i, time)| Observation {
            time: time.clone(),
            wind_speed: value_at(&hourly.windspeed_10m, i),
            wind_dir: value_at(&hourly.winddirection_10m, i),
            temp: value_at(&hourly.temperature_2m, i),
            pressure: value_at(&hourly.pressure_msl, i),
            humidity: value_at(&hourly.relativehumidity_2m, i),
            lclouds: value_at(&hourly.cloudcover_low, i),
            mclouds: value_at(&hourly.cloudcover_mid, i),
            hclouds: value_at(&hourly.cloudcover_high, i),
            precip: value_at(&hourly.precipitation, i),
            cape: value_at(&hourly.cape, i),
            source: "openmeteo".to_string(),
        })
        .collect();

    Ok(rows)
}

impl WeatherSource for OpenMeteo {
    fn name(&self) -> &str {
        "openmeteo"
    }

    /// Requests one day at a time and stops at the first failed day,
    /// keeping the days already fetched.
    fn fetch(&self, client: &Client, start: NaiveDate, end: NaiveDate) -> Vec<Observation> {
        let mut rows = Vec::new();
        let mut day = start;

        while day <= end {
            let batch = send_text(client.get(self.day_url(day)))
                .and_then(|body| parse_open_meteo(&body));

            match batch {
                Ok(mut batch) => rows.append(&mut batch),
                Err(err) => {
                    warn!(%day, %err, "failed to fetch Open-Meteo data");
                    break;
                }
            }

            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        rows
    }
}

/// Meteostat hourly station data (requires an API key)
#[derive(Debug, Clone)]
pub struct Meteostat {
    station: String,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MeteostatResponse {
    data: Option<Vec<MeteostatRow>>,
}

#[derive(Debug, Deserialize)]
struct MeteostatRow {
    time: Option<String>,
    wspd: Option<f64>,
    wdir: Option<f64>,
    temp: Option<f64>,
    pres: Option<f64>,
    rhum: Option<f64>,
    prcp: Option<f64>,
}

impl Meteostat {
    pub fn new(station: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            station: station.into(),
            api_key,
            base_url: METEOSTAT_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn url(&self, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}?station={}&start={}&end={}&tz=UTC",
            self.base_url, self.station, start, end
        )
    }
}

/// Decode a Meteostat hourly response
pub fn parse_meteostat(body: &str) -> Result<Vec<Observation>> {
    let response: MeteostatResponse = serde_json::from_str(body)?;

    let rows = response
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|row| Observation {
            time: row.time.unwrap_or_default(),
            wind_speed: row.wspd,
            wind_dir: row.wdir,
            temp: row.temp,
            pressure: row.pres,
            humidity: row.rhum,
            precip: row.prcp,
            source: "meteostat".to_string(),
            ..Observation::default()
        })
        .collect();

    Ok(rows)
}

impl WeatherSource for Meteostat {
    fn name(&self) -> &str {
        "meteostat"
    }

    fn fetch(&self, client: &Client, start: NaiveDate, end: NaiveDate) -> Vec<Observation> {
        let Some(api_key) = &self.api_key else {
            warn!("METEOSTAT_API_KEY not set, skipping Meteostat fetch");
            return Vec::new();
        };

        let request = client
            .get(self.url(start, end))
            .header("x-api-key", api_key);

        match send_text(request).and_then(|body| parse_meteostat(&body)) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(%err, "failed to fetch Meteostat data");
                Vec::new()
            }
        }
    }
}

/// Windy point forecast (requires an API key)
#[derive(Debug, Clone)]
pub struct Windy {
    latitude: f64,
    longitude: f64,
    api_key: Option<String>,
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WindyResponse {
    ts: Vec<f64>,
    wind: Vec<Option<f64>>,
    temp: Vec<Option<f64>>,
    pressure: Vec<Option<f64>>,
    rh: Vec<Option<f64>>,
}

impl Windy {
    pub fn new(latitude: f64, longitude: f64, api_key: Option<String>) -> Self {
        Self {
            latitude,
            longitude,
            api_key,
            url: WINDY_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// JSON body of the point-forecast request
    pub fn request_body(&self, start: NaiveDate, end: NaiveDate) -> serde_json::Value {
        json!({
            "lat": self.latitude,
            "lon": self.longitude,
            "model": "gfs",
            "parameters": ["wind", "temp", "pressure", "rh"],
            "levels": ["surface"],
            "start": start.to_string(),
            "end": end.to_string(),
        })
    }
}

/// Decode a Windy point-forecast response.
///
/// `ts` entries are read as Unix seconds; entries outside the representable
/// date range are dropped.
pub fn parse_windy(body: &str) -> Result<Vec<Observation>> {
    let response: WindyResponse = serde_json::from_str(body)?;

    let rows = response
        .ts
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let time = DateTime::<Utc>::from_timestamp(ts.trunc() as i64, 0)?;
            Some(Observation {
                time: format!("{}Z", time.format("%Y-%m-%dT%H:%M:%S")),
                wind_speed: value_at(&response.wind, i),
                temp: value_at(&response.temp, i),
                pressure: value_at(&response.pressure, i),
                humidity: value_at(&response.rh, i),
                source: "windy".to_string(),
                ..Observation::default()
            })
        })
        .collect();

    Ok(rows)
}

impl WeatherSource for Windy {
    fn name(&self) -> &str {
        "windy"
    }

    fn fetch(&self, client: &Client, start: NaiveDate, end: NaiveDate) -> Vec<Observation> {
        let Some(api_key) = &self.api_key else {
            warn!("WINDY_API_KEY not set, skipping Windy fetch");
            return Vec::new();
        };

        let request = client
            .post(&self.url)
            .header("x-windy-key", api_key)
            .json(&self.request_body(start, end));

        match send_text(request).and_then(|body| parse_windy(&body)) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(%err, "failed to fetch Windy data");
                Vec::new()
            }
        }
    }
}

/// Latest live observation scraped from Weather Underground
#[derive(Debug, Clone)]
pub struct WeatherUnderground {
    url: String,
}

impl Default for WeatherUnderground {
    fn default() -> Self {
        Self {
            url: WUNDERGROUND_URL.to_string(),
        }
    }
}

impl WeatherUnderground {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

fn observation_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r#"\{"obsTimeUtc":"(.*?)".*?"winddir":(\d+).*?"windspd":(\d+).*?"temp":([-\d.]+).*?"pressure":([-\d.]+).*?"humidity":(\d+)"#,
            )
            .ok()
        })
        .as_ref()
}

/// Extract the latest observation embedded in a Weather Underground page.
///
/// When the page carries no recognizable observation, returns a row holding
/// only `now` as its timestamp, tagged `wunderground_html`.
pub fn parse_wunderground(html: &str, now: DateTime<Utc>) -> Observation {
    let captures = observation_pattern().and_then(|pattern| pattern.captures(html));

    match captures {
        Some(caps) => {
            let number = |group: usize| caps.get(group).and_then(|m| m.as_str().parse().ok());
            Observation {
                time: caps
                    .get(1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
                wind_speed: number(3),
                wind_dir: number(2),
                temp: number(4),
                pressure: number(5),
                humidity: number(6),
                source: "wunderground".to_string(),
                ..Observation::default()
            }
        }
        None => Observation::new(
            now.to_rfc3339_opts(SecondsFormat::Micros, true),
            "wunderground_html",
        ),
    }
}

impl WeatherSource for WeatherUnderground {
    fn name(&self) -> &str {
        "wunderground"
    }

    /// Live source: the date range is ignored
    fn fetch(&self, client: &Client, _start: NaiveDate, _end: NaiveDate) -> Vec<Observation> {
        match send_text(client.get(&self.url)) {
            Ok(html) => vec![parse_wunderground(&html, Utc::now())],
            Err(err) => {
                warn!(%err, "failed to fetch Weather Underground data");
                Vec::new()
            }
        }
    }
}

/// Runs a list of sources against one HTTP client
pub struct Fetcher {
    client: Client,
    sources: Vec<Box<dyn WeatherSource>>,
}

impl Fetcher {
    /// Fetcher over every known provider, in order: Open-Meteo, Meteostat,
    /// Windy, Weather Underground
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let sources: Vec<Box<dyn WeatherSource>> = vec![
            Box::new(OpenMeteo::new(config.latitude, config.longitude)),
            Box::new(Meteostat::new(
                config.meteostat_station.clone(),
                config.meteostat_api_key.clone(),
            )),
            Box::new(Windy::new(
                config.latitude,
                config.longitude,
                config.windy_api_key.clone(),
            )),
            Box::new(WeatherUnderground::default()),
        ];

        Ok(Self::with_sources(client, sources))
    }

    pub fn with_sources(client: Client, sources: Vec<Box<dyn WeatherSource>>) -> Self {
        Self { client, sources }
    }

    /// Names of the configured sources, in fetch order
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Concatenate the rows of every source, in source order
    pub fn fetch_all(&self, start: NaiveDate, end: NaiveDate) -> Vec<Observation> {
        let mut rows = Vec::new();

        for source in &self.sources {
            let batch = source.fetch(&self.client, start, end);
            info!(source = source.name(), rows = batch.len(), "fetched observations");
            rows.extend(batch);
        }

        rows
    }
}

impl fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("sources", &self.source_names())
            .finish_non_exhaustive()
    }
}
