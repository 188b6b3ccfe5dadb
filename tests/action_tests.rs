//! Reducer and action tests using EffectStore and TestHarness
//!
//! Covers the selection state machine, the request-generation guard and the
//! action categories.

use helios::{
    action::Action,
    effect::Effect,
    geo::Coordinate,
    reducer::reducer,
    state::{
        AppState, CurrentConditions, HourlyPoint, Phase, RequestId, Tagged, TempUnit,
        WeatherSnapshot,
    },
};
use pretty_assertions::assert_eq;
use tui_dispatch::testing::*;
use tui_dispatch::{EffectStore, assert_emitted, assert_not_emitted};

fn at(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).unwrap()
}

fn snapshot(temperature: f64) -> WeatherSnapshot {
    WeatherSnapshot {
        current: CurrentConditions {
            temperature,
            apparent_temperature: temperature - 1.0,
            humidity: 50.0,
            precipitation: 0.0,
            weather_code: 0,
            wind_speed: 5.0,
        },
        hourly: (0..30)
            .map(|h| HourlyPoint {
                timestamp: format!("2024-06-{:02}T{:02}:00", 1 + h / 24, h % 24),
                temperature,
                precipitation_probability: Some(10.0),
            })
            .collect(),
    }
}

#[test]
fn test_reducer_select_location() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    assert_eq!(store.state().phase, Phase::Idle);

    let result = store.dispatch(Action::LocationSelect(at(20.0, 0.0)));

    assert!(result.changed, "State should change");
    assert_eq!(store.state().phase, Phase::Loading);
    assert_eq!(store.state().coordinate, Some(at(20.0, 0.0)));
    assert_eq!(result.effects.len(), 2);
    assert!(matches!(result.effects[0], Effect::PlaceMarker { .. }));
    assert!(matches!(
        result.effects[1],
        Effect::FetchWeather {
            request: RequestId(1),
            ..
        }
    ));
}

#[test]
fn test_reducer_load_renders_windowed_chart() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::LocationSelect(at(20.0, 0.0)));

    let result = store.dispatch(Action::WeatherDidLoad(Tagged::new(
        RequestId(1),
        snapshot(23.4),
    )));

    assert!(result.changed);
    assert_eq!(store.state().phase, Phase::Ready);
    assert_eq!(store.state().snapshot, Some(snapshot(23.4)));
    match &result.effects[..] {
        [Effect::RenderChart { series }] => {
            assert_eq!(series.len(), 24);
            assert_eq!(series.points[0].hour_label, "0:00");
            assert_eq!(series.points[23].hour_label, "23:00");
        }
        other => panic!("expected a single RenderChart, got {other:?}"),
    }
}

#[test]
fn test_reducer_error_clears_snapshot_and_chart() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::LocationSelect(at(1.0, 1.0)));
    store.dispatch(Action::WeatherDidLoad(Tagged::new(RequestId(1), snapshot(10.0))));

    store.dispatch(Action::LocationSelect(at(2.0, 2.0)));
    let result = store.dispatch(Action::WeatherDidError(Tagged::new(
        RequestId(2),
        "weather service returned 500 Internal Server Error".into(),
    )));

    assert!(result.changed);
    assert_eq!(store.state().phase, Phase::Error);
    assert!(store.state().snapshot.is_none());
    assert!(store.state().visible_snapshot().is_none());
    assert_eq!(result.effects, vec![Effect::ClearChart]);
}

#[test]
fn test_late_response_for_superseded_selection_is_discarded() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    // A then B, B answers first
    store.dispatch(Action::LocationSelect(at(10.0, 10.0)));
    store.dispatch(Action::LocationSelect(at(-33.9, 18.4)));

    let b = store.dispatch(Action::WeatherDidLoad(Tagged::new(RequestId(2), snapshot(18.0))));
    assert!(b.changed);

    let a = store.dispatch(Action::WeatherDidLoad(Tagged::new(RequestId(1), snapshot(30.0))));
    assert!(!a.changed, "stale response must not change state");
    assert!(a.effects.is_empty());

    assert_eq!(store.state().coordinate, Some(at(-33.9, 18.4)));
    assert_eq!(store.state().phase, Phase::Ready);
    assert_eq!(store.state().snapshot, Some(snapshot(18.0)));
}

#[test]
fn test_late_failure_for_superseded_selection_is_discarded() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::LocationSelect(at(10.0, 10.0)));
    store.dispatch(Action::LocationSelect(at(11.0, 11.0)));

    let result = store.dispatch(Action::WeatherDidError(Tagged::new(
        RequestId(1),
        "timeout".into(),
    )));

    assert!(!result.changed);
    assert_eq!(store.state().phase, Phase::Loading);
    assert!(store.state().error.is_none());
}

#[test]
fn test_refresh_reissues_current_selection() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    // nothing selected yet
    let result = store.dispatch(Action::LocationRefresh);
    assert!(!result.changed);
    assert!(result.effects.is_empty());

    store.dispatch(Action::LocationSelect(at(48.85, 2.35)));
    let result = store.dispatch(Action::LocationRefresh);
    assert_eq!(store.state().latest_request, RequestId(2));
    assert_eq!(
        result.effects[1],
        Effect::FetchWeather {
            request: RequestId(2),
            coordinate: at(48.85, 2.35),
        }
    );
}

#[test]
fn test_reducer_toggle_units() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    assert_eq!(store.state().unit, TempUnit::Celsius);
    store.dispatch(Action::UiToggleUnits);
    assert_eq!(store.state().unit, TempUnit::Fahrenheit);
    store.dispatch(Action::UiToggleUnits);
    assert_eq!(store.state().unit, TempUnit::Celsius);
}

#[test]
fn test_tick_only_animates_while_loading() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    assert!(!store.dispatch(Action::Tick).changed);

    store.dispatch(Action::LocationSelect(at(0.0, 0.0)));
    assert!(store.dispatch(Action::Tick).changed);
    assert_eq!(store.state().tick_count, 1);
}

#[test]
fn test_action_categories() {
    let did_load = Action::WeatherDidLoad(Tagged::new(RequestId(1), WeatherSnapshot::default()));
    let select = Action::LocationSelect(at(0.0, 0.0));
    let toggle = Action::UiToggleUnits;
    let tick = Action::Tick;

    assert_eq!(did_load.category(), Some("weather_did"));
    assert_eq!(select.category(), Some("location"));
    assert_eq!(toggle.category(), Some("ui"));
    assert_eq!(tick.category(), None);

    assert!(did_load.is_weather_did());
    assert!(select.is_location());
    assert!(toggle.is_ui());
}

#[test]
fn test_harness_emit_and_drain() {
    let mut harness = TestHarness::<(), Action>::new(());

    harness.emit(Action::LocationSelect(at(1.0, 2.0)));
    harness.emit(Action::UiToggleUnits);
    harness.emit(Action::WeatherDidError(Tagged::new(RequestId(1), "oops".into())));

    let actions = harness.drain_emitted();
    actions.assert_count(3);
}

#[test]
fn test_assert_emitted_macro() {
    let actions = vec![
        Action::LocationSelect(at(1.0, 2.0)),
        Action::WeatherDidLoad(Tagged::new(RequestId(1), WeatherSnapshot::default())),
    ];

    assert_emitted!(actions, Action::LocationSelect(_));
    assert_emitted!(actions, Action::WeatherDidLoad(_));
    assert_not_emitted!(actions, Action::Quit);
    assert_not_emitted!(actions, Action::WeatherDidError(_));
}

#[test]
fn test_temp_unit_formatting() {
    assert_eq!(TempUnit::Celsius.format(23.4), "23°C");
    assert_eq!(TempUnit::Fahrenheit.format(0.0), "32°F");
    assert_eq!(TempUnit::Fahrenheit.format(100.0), "212°F");
    assert_eq!(TempUnit::Celsius.format_short(20.6), "21°");
}

#[test]
fn test_replayed_selection_off_the_globe_is_rejected() {
    let valid: Action = serde_json::from_str(r#"{"LocationSelect":{"lat":20.0,"lng":0.0}}"#).unwrap();
    assert_eq!(valid, Action::LocationSelect(at(20.0, 0.0)));

    let result = serde_json::from_str::<Action>(r#"{"LocationSelect":{"lat":500.0,"lng":0.0}}"#);
    assert!(result.is_err(), "got {result:?}");
}
