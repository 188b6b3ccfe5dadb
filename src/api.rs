//! Open-Meteo forecast client

use serde::Deserialize;

use crate::geo::Coordinate;
use crate::state::{parse_hour, CurrentConditions, HourlyPoint, WeatherSnapshot};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,precipitation,weather_code,wind_speed_10m";
const HOURLY_FIELDS: &str = "temperature_2m,precipitation_probability";
const FORECAST_DAYS: u8 = 1;

/// Why a fetch produced no snapshot
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("weather request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("weather service returned {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed weather payload: {0}")]
    Schema(String),
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentResponse,
    hourly: HourlyResponse,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    precipitation: f64,
    weather_code: u16,
    wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
struct HourlyResponse {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    precipitation_probability: Vec<Option<f64>>,
}

impl TryFrom<ForecastResponse> for WeatherSnapshot {
    type Error = FetchError;

    fn try_from(data: ForecastResponse) -> Result<Self, Self::Error> {
        let HourlyResponse {
            time,
            temperature_2m,
            precipitation_probability,
        } = data.hourly;

        if time.len() != temperature_2m.len() || time.len() != precipitation_probability.len() {
            return Err(FetchError::Schema(format!(
                "hourly series lengths differ: time={}, temperature_2m={}, precipitation_probability={}",
                time.len(),
                temperature_2m.len(),
                precipitation_probability.len()
            )));
        }
        if let Some(bad) = time.iter().find(|t| parse_hour(t).is_none()) {
            return Err(FetchError::Schema(format!("unreadable hourly timestamp {bad:?}")));
        }

        let hourly = time
            .into_iter()
            .zip(temperature_2m)
            .zip(precipitation_probability)
            .map(|((timestamp, temperature), precipitation_probability)| HourlyPoint {
                timestamp,
                temperature,
                precipitation_probability,
            })
            .collect();

        let c = data.current;
        Ok(WeatherSnapshot {
            current: CurrentConditions {
                temperature: c.temperature_2m,
                apparent_temperature: c.apparent_temperature,
                humidity: c.relative_humidity_2m,
                precipitation: c.precipitation,
                weather_code: c.weather_code,
                wind_speed: c.wind_speed_10m,
            },
            hourly,
        })
    }
}

// ============================================================================
// Client
// ============================================================================

/// Single-attempt forecast fetcher. Cheap to clone; clones share the
/// connection pool.
#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn forecast_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&current={}&hourly={}&timezone=auto&forecast_days={}",
            self.base_url,
            coordinate.lat(),
            coordinate.lng(),
            CURRENT_FIELDS,
            HOURLY_FIELDS,
            FORECAST_DAYS
        )
    }

    /// Fetch current conditions and one day of hourly data in the point's
    /// local time zone.
    pub async fn fetch(&self, coordinate: Coordinate) -> Result<WeatherSnapshot, FetchError> {
        let url = self.forecast_url(coordinate);
        tracing::debug!(%coordinate, "requesting forecast");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let data: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Schema(e.to_string()))?;

        WeatherSnapshot::try_from(data)
    }
}
