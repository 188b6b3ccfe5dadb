//! Reducer - pure function: (state, action) -> DispatchResult
//!
//! Every selection bumps `latest_request`; fetch results carrying any other
//! tag are stale and leave the state untouched.

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::geo::Coordinate;
use crate::state::{AppState, ChartSeries, Phase};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Location actions =====
        Action::LocationSelect(coordinate) => select_location(state, coordinate),

        Action::LocationRefresh => match state.coordinate {
            Some(coordinate) => select_location(state, coordinate),
            None => DispatchResult::unchanged(),
        },

        // ===== Weather actions =====
        Action::WeatherDidLoad(result) => {
            if !state.is_latest(result.request) {
                tracing::debug!(
                    request = result.request.0,
                    latest = state.latest_request.0,
                    "discarding stale forecast"
                );
                return DispatchResult::unchanged();
            }
            let series = ChartSeries::from_snapshot(&result.payload);
            state.phase = Phase::Ready;
            state.snapshot = Some(result.payload);
            state.error = None;
            DispatchResult::changed_with(Effect::RenderChart { series })
        }

        Action::WeatherDidError(result) => {
            if !state.is_latest(result.request) {
                tracing::debug!(
                    request = result.request.0,
                    latest = state.latest_request.0,
                    "discarding stale fetch failure"
                );
                return DispatchResult::unchanged();
            }
            tracing::warn!(error = %result.payload, "forecast fetch failed");
            state.phase = Phase::Error;
            state.snapshot = None;
            state.error = Some(result.payload);
            DispatchResult::changed_with(Effect::ClearChart)
        }

        // ===== UI actions =====
        Action::UiToggleUnits => {
            state.unit = state.unit.toggle();
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            if state.is_loading() {
                state.tick_count = state.tick_count.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn select_location(state: &mut AppState, coordinate: Coordinate) -> DispatchResult<Effect> {
    let request = state.latest_request.next();
    tracing::info!(%coordinate, request = request.0, "location selected");

    state.latest_request = request;
    state.phase = Phase::Loading;
    state.coordinate = Some(coordinate);
    state.tick_count = 0;

    // Marker first: the controller applies it before the fetch is spawned.
    let mut result = DispatchResult::changed_with(Effect::PlaceMarker { coordinate });
    result.effects.push(Effect::FetchWeather {
        request,
        coordinate,
    });
    result
}
