//! Dashboard controller: owns the map and chart surfaces, applies the
//! reducer's effects to them and lays out the whole screen.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Block,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use crate::action::Action;
use crate::components::metric_cards::CARD_HEIGHT;
use crate::components::{Component, Header, HeaderProps, MetricCards, MetricCardsProps};
use crate::effect::Effect;
use crate::geo::Coordinate;
use crate::state::{AppState, RequestId};
use crate::surface::{ChartSurface, DrawingSurface, GeoSurface, GeoSurfaceProps, MapDetail};

const HEADER_HEIGHT: u16 = 5;
/// Smallest map region worth binding an instance to.
const MIN_MAP_WIDTH: u16 = 12;
const MIN_MAP_HEIGHT: u16 = 6;

pub const CHART_TITLE: &str = " 24-Hour Thermal Projection ";
const CHART_BADGE: &str = " LIVE DATA ";
const PANEL_BORDER: Color = Color::Rgb(30, 41, 59);
const ACCENT: Color = Color::Rgb(34, 211, 238);

/// A fetch the runtime should spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchRequest {
    pub request: RequestId,
    pub coordinate: Coordinate,
}

pub struct DashboardController {
    geo: GeoSurface,
    chart: ChartSurface,
    map_surface: DrawingSurface,
    header: Header,
    cards: MetricCards,
}

impl DashboardController {
    pub fn new(detail: MapDetail) -> Self {
        let mut geo = GeoSurface::new(detail);
        geo.on_select(Action::LocationSelect);
        Self {
            geo,
            chart: ChartSurface::new(),
            map_surface: DrawingSurface::new(),
            header: Header,
            cards: MetricCards,
        }
    }

    pub fn geo(&self) -> &GeoSurface {
        &self.geo
    }

    pub fn chart(&self) -> &ChartSurface {
        &self.chart
    }

    pub fn map_surface(&self) -> &DrawingSurface {
        &self.map_surface
    }

    /// Apply one effect to the surfaces. Fetches are handed back to the
    /// caller, which owns the task runtime.
    pub fn apply(&mut self, effect: Effect) -> Option<FetchRequest> {
        match effect {
            Effect::PlaceMarker { coordinate } => {
                self.geo.set_selection(coordinate);
                None
            }
            Effect::FetchWeather {
                request,
                coordinate,
            } => Some(FetchRequest {
                request,
                coordinate,
            }),
            Effect::RenderChart { series } => {
                self.chart.render(&series);
                None
            }
            Effect::ClearChart => {
                self.chart.dispose();
                None
            }
        }
    }

    /// Release both surfaces. Safe to call more than once.
    pub fn teardown(&mut self) {
        self.geo.teardown(&mut self.map_surface);
        self.chart.dispose();
    }

    pub fn handle_event(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        let props = GeoSurfaceProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.geo.handle_event(event, props).into_iter().collect();
        if !actions.is_empty() {
            return actions;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('r') | KeyCode::F(5) => vec![Action::LocationRefresh],
                KeyCode::Char('u') => vec![Action::UiToggleUnits],
                KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState, is_focused: bool) {
        let rows = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT), // Banner
            Constraint::Min(1),                // Map + data
            Constraint::Length(1),             // Help bar
        ])
        .split(area);

        self.header.render(
            frame,
            rows[0],
            HeaderProps {
                is_scanning: state.is_loading(),
                tick_count: state.tick_count,
            },
        );

        let body = Layout::horizontal([
            Constraint::Percentage(42), // Map
            Constraint::Percentage(58), // Data panel
        ])
        .split(rows[1]);

        self.render_map(frame, body[0], state, is_focused);
        self.render_data(frame, body[1], state);
        render_help(frame, rows[2]);
    }

    fn render_map(&mut self, frame: &mut Frame, area: Rect, state: &AppState, is_focused: bool) {
        if area.width < MIN_MAP_WIDTH || area.height < MIN_MAP_HEIGHT {
            self.map_surface.unmount();
        } else {
            self.map_surface.mount(area);
        }
        self.geo.initialize(&mut self.map_surface);
        self.geo
            .render(frame, area, GeoSurfaceProps { state, is_focused });
    }

    fn render_data(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(snapshot) = state.visible_snapshot() else {
            self.cards.render(
                frame,
                area,
                MetricCardsProps {
                    snapshot: None,
                    unit: state.unit,
                    error: state.error.as_deref(),
                },
            );
            return;
        };

        let rows = Layout::vertical([
            Constraint::Length(CARD_HEIGHT), // Metric cards
            Constraint::Min(3),              // Chart
        ])
        .split(area);

        self.cards.render(
            frame,
            rows[0],
            MetricCardsProps {
                snapshot: Some(snapshot),
                unit: state.unit,
                error: None,
            },
        );

        let block = Block::bordered()
            .border_style(Style::default().fg(PANEL_BORDER))
            .title(Span::styled(CHART_TITLE, Style::default().fg(Color::White)))
            .title(Line::from(Span::styled(CHART_BADGE, Style::default().fg(ACCENT))).right_aligned());
        let inner = block.inner(rows[1]);
        frame.render_widget(block, rows[1]);
        self.chart.draw(frame, inner);
    }
}

fn render_help(frame: &mut Frame, area: Rect) {
    let mut status_bar = StatusBar::new();
    <StatusBar as Component<Action>>::render(
        &mut status_bar,
        frame,
        area,
        StatusBarProps {
            left: StatusBarSection::empty(),
            center: StatusBarSection::hints(&[
                StatusBarHint::new("click/enter", "select"),
                StatusBarHint::new("hjkl", "move"),
                StatusBarHint::new("+/-", "zoom"),
                StatusBarHint::new("r", "refresh"),
                StatusBarHint::new("u", "units"),
                StatusBarHint::new("q", "quit"),
            ]),
            right: StatusBarSection::empty(),
            style: StatusBarStyle::default(),
            is_focused: false,
        },
    );
}
