//! Helios - world map weather dashboard

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use helios::action::Action;
use helios::api::{DEFAULT_BASE_URL, WeatherClient};
use helios::controller::{DashboardController, FetchRequest};
use helios::effect::Effect;
use helios::geo::Coordinate;
use helios::logging;
use helios::reducer::reducer;
use helios::state::{AppState, LOADING_ANIM_TICK_MS, Tagged};
use helios::surface::MapDetail;
use ratatui::{Terminal, backend::CrosstermBackend};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// Helios - pick a point on the world map, see its weather
#[derive(Parser, Debug)]
#[command(name = "helios")]
#[command(about = "A world map weather dashboard for the terminal")]
struct Args {
    /// Latitude of an initial selection (requires --lng)
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of an initial selection (requires --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lng: Option<f64>,

    /// Forecast API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Coastline resolution
    #[arg(long, value_enum, default_value_t = MapDetail::Low)]
    detail: MapDetail,

    /// Refresh interval in seconds (minimum 1)
    #[arg(long, short, default_value = "300", value_parser = clap::value_parser!(u64).range(1..))]
    refresh_interval: u64,

    /// Append tracing output to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum HeliosComponentId {
    Dashboard,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum HeliosContext {
    Main,
}

impl EventRoutingState<HeliosComponentId, HeliosContext> for AppState {
    fn focused(&self) -> Option<HeliosComponentId> {
        Some(HeliosComponentId::Dashboard)
    }

    fn modal(&self) -> Option<HeliosComponentId> {
        None
    }

    fn binding_context(&self, _id: HeliosComponentId) -> HeliosContext {
        HeliosContext::Main
    }

    fn default_context(&self) -> HeliosContext {
        HeliosContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        lat,
        lng,
        api_url,
        detail,
        refresh_interval,
        log_file,
        debug: debug_args,
    } = Args::parse();

    logging::init(log_file.as_deref())?;

    let initial_selection = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng).map_err(io::Error::other)?),
        _ => None,
    };

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let client = WeatherClient::new(api_url);
    tracing::info!(base_url = client.base_url(), ?detail, "starting dashboard");

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let controller = Rc::new(RefCell::new(DashboardController::new(detail)));
    let result = run_app(
        &mut terminal,
        &debug,
        store,
        RunConfig {
            controller: Rc::clone(&controller),
            client,
            initial_selection,
            refresh_interval,
        },
        replay_actions,
    )
    .await;

    controller.borrow_mut().teardown();

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct RunConfig {
    controller: Rc<RefCell<DashboardController>>,
    client: WeatherClient,
    initial_selection: Option<Coordinate>,
    refresh_interval: u64,
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    config: RunConfig,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let RunConfig {
        controller,
        client,
        initial_selection,
        refresh_interval,
    } = config;

    let mut bus: EventBus<AppState, Action, HeliosComponentId, HeliosContext> = EventBus::new();
    let keybindings: Keybindings<HeliosContext> = Keybindings::new();

    let events = Rc::clone(&controller);
    bus.register(HeliosComponentId::Dashboard, move |event, state| {
        let actions = events.borrow_mut().handle_event(&event.kind, state);
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    let effects = Rc::clone(&controller);
    let handle_effect = move |effect: Effect, ctx: &mut EffectContext<Action>| {
        if let Some(fetch) = effects.borrow_mut().apply(effect) {
            spawn_fetch(&client, fetch, ctx);
        }
    };

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            initial_selection.map(Action::LocationSelect),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );

                runtime.subscriptions().interval(
                    "refresh",
                    Duration::from_secs(refresh_interval),
                    || Action::LocationRefresh,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                event_ctx.set_component_area(HeliosComponentId::Dashboard, area);
                controller
                    .borrow_mut()
                    .render(frame, area, state, render_ctx.is_focused());
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Spawn the forecast fetch; its result is tagged with the request that
/// issued it so the reducer can drop superseded answers.
fn spawn_fetch(client: &WeatherClient, fetch: FetchRequest, ctx: &mut EffectContext<Action>) {
    let client = client.clone();
    let FetchRequest {
        request,
        coordinate,
    } = fetch;
    ctx.tasks().spawn(TaskKey::new("weather"), async move {
        match client.fetch(coordinate).await {
            Ok(snapshot) => {
                tracing::info!(request = request.0, %coordinate, "forecast loaded");
                Action::WeatherDidLoad(Tagged::new(request, snapshot))
            }
            Err(e) => Action::WeatherDidError(Tagged::new(request, e.to_string())),
        }
    });
}
