//! Actions: user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::state::{Tagged, WeatherSnapshot};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Location category =====
    /// Intent: a point on the map was picked (click or crosshair)
    LocationSelect(Coordinate),

    /// Intent: fetch again for the current selection
    LocationRefresh,

    // ===== Weather category =====
    /// Result: forecast loaded for the tagged request
    WeatherDidLoad(Tagged<WeatherSnapshot>),

    /// Result: forecast failed for the tagged request
    WeatherDidError(Tagged<String>),

    // ===== UI category =====
    /// Toggle between Celsius and Fahrenheit
    UiToggleUnits,

    /// Force a re-render (crosshair movement, zoom)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for the loading spinner
    Tick,

    /// Exit the application
    Quit,
}
