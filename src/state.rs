//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Number of hourly entries shown in the projection chart.
pub const CHART_WINDOW: usize = 24;

/// Spinner timing for the status overlay while a fetch is in flight.
pub const LOADING_ANIM_TICK_MS: u64 = 80;

/// Current conditions at the selected point, full precision.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CurrentConditions {
    /// °C
    pub temperature: f64,
    /// °C
    pub apparent_temperature: f64,
    /// Relative humidity, %
    pub humidity: f64,
    /// mm
    pub precipitation: f64,
    /// WMO weather code
    pub weather_code: u16,
    /// km/h
    pub wind_speed: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HourlyPoint {
    /// Local ISO-8601 timestamp, e.g. `2024-01-15T13:00`
    pub timestamp: String,
    pub temperature: f64,
    pub precipitation_probability: Option<f64>,
}

impl HourlyPoint {
    /// Hour of day taken from the timestamp's time component.
    pub fn hour(&self) -> Option<u8> {
        parse_hour(&self.timestamp)
    }
}

/// Extract the hour (0-23) from `YYYY-MM-DDTHH:MM[...]`.
pub fn parse_hour(timestamp: &str) -> Option<u8> {
    let (_, time) = timestamp.split_once('T')?;
    let hour: u8 = time.get(..2)?.parse().ok()?;
    (hour < 24).then_some(hour)
}

/// One fetched weather result. Replaced wholesale, never patched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyPoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChartPoint {
    pub hour_label: String,
    pub temperature: f64,
}

/// The first [`CHART_WINDOW`] hourly temperatures, labelled by hour.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        let points = snapshot
            .hourly
            .iter()
            .take(CHART_WINDOW)
            .map(|point| ChartPoint {
                hour_label: hour_label(point.hour()),
                temperature: point.temperature,
            })
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn hour_label(hour: Option<u8>) -> String {
    match hour {
        Some(h) => format!("{}:00", h),
        None => "--:00".to_string(),
    }
}

/// Monotonic tag attached to every selection's fetch.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct RequestId(pub u64);

impl RequestId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A fetch result paired with the request that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Tagged<T> {
    pub request: RequestId,
    pub payload: T,
}

impl<T> Tagged<T> {
    pub fn new(request: RequestId, payload: T) -> Self {
        Self { request, payload }
    }
}

/// Dashboard lifecycle. There is no terminal phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Temperature unit preference (display only)
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    pub fn toggle(&self) -> Self {
        match self {
            TempUnit::Celsius => TempUnit::Fahrenheit,
            TempUnit::Fahrenheit => TempUnit::Celsius,
        }
    }

    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            TempUnit::Celsius => celsius,
            TempUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// Rounded reading with unit suffix, e.g. `23°C`.
    pub fn format(&self, celsius: f64) -> String {
        let symbol = match self {
            TempUnit::Celsius => "C",
            TempUnit::Fahrenheit => "F",
        };
        format!("{}°{}", self.rounded(celsius), symbol)
    }

    /// Rounded reading without the unit letter, e.g. `21°`.
    pub fn format_short(&self, celsius: f64) -> String {
        format!("{}°", self.rounded(celsius))
    }

    fn rounded(&self, celsius: f64) -> f64 {
        let value = self.convert(celsius).round();
        // avoid printing "-0"
        if value == 0.0 { 0.0 } else { value }
    }
}

/// Human-readable label for a WMO weather code.
pub fn conditions_label(code: u16) -> &'static str {
    match code {
        0 => "Clear Sky",
        1 => "Mainly Clear",
        2 => "Partly Cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing Drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing Rain",
        71 | 73 | 75 => "Snow",
        77 => "Snow Grains",
        80..=82 => "Rain Showers",
        85 | 86 => "Snow Showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with Hail",
        _ => "Unknown",
    }
}

/// Dashboard state - everything the surfaces and cards render from
#[derive(Clone, Debug, Default, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Idle → Loading → Ready/Error, re-entered on every selection
    #[debug(section = "Selection", label = "Phase", debug_fmt)]
    pub phase: Phase,

    /// Most recently selected point
    #[debug(section = "Selection", label = "Coordinate", debug_fmt)]
    pub coordinate: Option<Coordinate>,

    /// Tag of the most recently issued fetch; only this one may resolve
    #[debug(section = "Selection", label = "Request", debug_fmt)]
    pub latest_request: RequestId,

    #[debug(section = "Weather", label = "Snapshot", debug_fmt)]
    pub snapshot: Option<WeatherSnapshot>,

    #[debug(section = "Weather", label = "Error", debug_fmt)]
    pub error: Option<String>,

    #[debug(section = "Weather", label = "Unit", debug_fmt)]
    pub unit: TempUnit,

    /// Spinner frame counter
    #[debug(skip)]
    pub tick_count: u32,
}

impl AppState {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn is_latest(&self, request: RequestId) -> bool {
        request == self.latest_request
    }

    /// Snapshot to show in the metric cards, if the dashboard has a signal.
    pub fn visible_snapshot(&self) -> Option<&WeatherSnapshot> {
        match self.phase {
            Phase::Error | Phase::Idle => None,
            Phase::Loading | Phase::Ready => self.snapshot.as_ref(),
        }
    }
}
