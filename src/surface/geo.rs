//! World map surface: coastline canvas, crosshair targeting and the
//! selection marker.

use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Map, MapResolution},
        Block, Paragraph,
    },
    Frame,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::EventKind;

use super::{DrawingSurface, InstanceId};
use crate::action::Action;
use crate::components::Component;
use crate::geo::{Coordinate, MAX_LAT, MAX_LNG};
use crate::state::AppState;

pub const BACKGROUND: Color = Color::Rgb(2, 6, 23);
const COASTLINE: Color = Color::Rgb(71, 85, 105);
const BORDER: Color = Color::Rgb(30, 41, 59);
const MARKER: Color = Color::Rgb(34, 211, 238);
const MARKER_FILL: Color = Color::Rgb(6, 182, 212);
const ACCENT: Color = Color::Rgb(34, 211, 238);
const MUTED: Color = Color::Rgb(100, 116, 139);

/// Braille spinner shown next to the scanning label.
pub const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Crosshair step as a fraction of the visible span.
const CURSOR_STEPS_LNG: f64 = 48.0;
const CURSOR_STEPS_LAT: f64 = 24.0;

/// Coastline detail
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum MapDetail {
    #[default]
    Low,
    High,
}

impl From<MapDetail> for MapResolution {
    fn from(detail: MapDetail) -> Self {
        match detail {
            MapDetail::Low => MapResolution::Low,
            MapDetail::High => MapResolution::High,
        }
    }
}

// ============================================================================
// Viewport
// ============================================================================

/// Visible window onto the globe. Zoom 0 shows the whole world and each
/// level halves both spans.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapView {
    center: Coordinate,
    zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self::world()
    }
}

impl MapView {
    pub const MAX_ZOOM: u8 = 6;

    pub fn world() -> Self {
        Self {
            center: Coordinate::default(),
            zoom: 0,
        }
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Half-spans in degrees: `(lat, lng)`.
    fn half_spans(&self) -> (f64, f64) {
        let scale = f64::from(1u32 << self.zoom);
        (MAX_LAT / scale, MAX_LNG / scale)
    }

    /// `(x_bounds, y_bounds)` as longitude and latitude ranges, kept inside
    /// the world.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let (half_lat, half_lng) = self.half_spans();
        let lat = self.center.lat().clamp(-MAX_LAT + half_lat, MAX_LAT - half_lat);
        let lng = self.center.lng().clamp(-MAX_LNG + half_lng, MAX_LNG - half_lng);
        ([lng - half_lng, lng + half_lng], [lat - half_lat, lat + half_lat])
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        let ([west, east], [south, north]) = self.bounds();
        (west..=east).contains(&coordinate.lng()) && (south..=north).contains(&coordinate.lat())
    }

    pub fn zoom_in(&mut self, focus: Coordinate) {
        if self.zoom < Self::MAX_ZOOM {
            self.zoom += 1;
            self.center = focus;
        }
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1);
        if self.zoom == 0 {
            self.center = Coordinate::default();
        }
    }

    /// Degrees moved by one crosshair step: `(lat, lng)`.
    pub fn cursor_step(&self) -> (f64, f64) {
        let (half_lat, half_lng) = self.half_spans();
        (2.0 * half_lat / CURSOR_STEPS_LAT, 2.0 * half_lng / CURSOR_STEPS_LNG)
    }

    /// Resolve a terminal cell inside `area` to the coordinate at its centre.
    pub fn project(&self, area: Rect, column: u16, row: u16) -> Option<Coordinate> {
        if area.is_empty() || !area.contains(Position::new(column, row)) {
            return None;
        }
        let ([west, east], [south, north]) = self.bounds();
        let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
        let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
        Some(Coordinate::clamped(
            north - fy * (north - south),
            west + fx * (east - west),
        ))
    }
}

// ============================================================================
// Map instance (owned handle)
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum MapLayer {
    Coastline,
    Selection(Coordinate),
}

#[derive(Debug)]
pub struct MapInstance {
    id: InstanceId,
    view: MapView,
    detail: MapDetail,
    cursor: Coordinate,
    layers: Vec<MapLayer>,
}

impl MapInstance {
    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn cursor(&self) -> Coordinate {
        self.cursor
    }

    pub fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    pub fn selection_markers(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.layers.iter().filter_map(|layer| match layer {
            MapLayer::Selection(c) => Some(*c),
            MapLayer::Coastline => None,
        })
    }

    fn replace_selection(&mut self, coordinate: Coordinate) {
        self.layers
            .retain(|layer| !matches!(layer, MapLayer::Selection(_)));
        self.layers.push(MapLayer::Selection(coordinate));
    }

    fn move_cursor(&mut self, steps_lat: f64, steps_lng: f64) {
        let (step_lat, step_lng) = self.view.cursor_step();
        self.cursor = self.cursor.offset(steps_lat * step_lat, steps_lng * step_lng);
        if !self.view.contains(self.cursor) && self.view.zoom() > 0 {
            // follow the crosshair
            self.view.center = self.cursor;
        }
    }
}

// ============================================================================
// Component
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    AlreadyBound,
    /// The surface has no area yet; retry on the next render pass.
    Skipped,
}

pub struct GeoSurfaceProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

pub struct GeoSurface {
    detail: MapDetail,
    instance: Option<MapInstance>,
    on_select: Option<fn(Coordinate) -> Action>,
    /// Selection requested before an instance existed
    pending_selection: Option<Coordinate>,
    /// Canvas area of the last draw, used for hit-testing
    canvas_area: Option<Rect>,
}

impl GeoSurface {
    /// Crosshair starting point
    pub const HOME: (f64, f64) = (20.0, 0.0);

    pub fn new(detail: MapDetail) -> Self {
        Self {
            detail,
            instance: None,
            on_select: None,
            pending_selection: None,
            canvas_area: None,
        }
    }

    pub fn instance(&self) -> Option<&MapInstance> {
        self.instance.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.instance.is_some()
    }

    /// Bind a map instance to `container`, unless one is already bound or
    /// the container is not mounted yet.
    pub fn initialize(&mut self, container: &mut DrawingSurface) -> InitOutcome {
        if self.instance.is_some() || container.is_bound() {
            return InitOutcome::AlreadyBound;
        }
        if !container.is_mounted() {
            tracing::trace!("map surface not mounted, skipping init");
            return InitOutcome::Skipped;
        }

        let id = container.bind();
        let mut layers = vec![MapLayer::Coastline];
        if let Some(coordinate) = self.pending_selection.take() {
            layers.push(MapLayer::Selection(coordinate));
        }
        let (lat, lng) = Self::HOME;
        self.instance = Some(MapInstance {
            id,
            view: MapView::world(),
            detail: self.detail,
            cursor: Coordinate::clamped(lat, lng),
            layers,
        });
        tracing::debug!(?id, "map instance created");
        InitOutcome::Created
    }

    /// Register the handler invoked once per selection.
    pub fn on_select(&mut self, callback: fn(Coordinate) -> Action) {
        self.on_select = Some(callback);
    }

    /// Remove every selection marker, then add one at `coordinate`.
    pub fn set_selection(&mut self, coordinate: Coordinate) {
        match self.instance.as_mut() {
            Some(instance) => {
                instance.replace_selection(coordinate);
                instance.cursor = coordinate;
            }
            None => self.pending_selection = Some(coordinate),
        }
    }

    /// Release the map instance and its binding. Repeated calls do nothing.
    ///
    /// The current selection is kept and placed again by the next
    /// [`initialize`](Self::initialize).
    pub fn teardown(&mut self, container: &mut DrawingSurface) {
        self.canvas_area = None;
        let Some(instance) = self.instance.take() else {
            return;
        };
        self.pending_selection = instance.selection_markers().last();
        container.release(instance.id);
        tracing::debug!(id = ?instance.id, "map instance released");
    }

    fn select(&self, coordinate: Coordinate) -> Option<Action> {
        self.on_select.map(|callback| callback(coordinate))
    }

    fn handle_click(&mut self, column: u16, row: u16) -> Option<Action> {
        let area = self.canvas_area?;
        let instance = self.instance.as_mut()?;
        let coordinate = instance.view.project(area, column, row)?;
        instance.cursor = coordinate;
        self.select(coordinate)
    }

    fn handle_key(&mut self, code: KeyCode) -> Option<Action> {
        let instance = self.instance.as_mut()?;
        match code {
            KeyCode::Left | KeyCode::Char('h') => instance.move_cursor(0.0, -1.0),
            KeyCode::Right | KeyCode::Char('l') => instance.move_cursor(0.0, 1.0),
            KeyCode::Up | KeyCode::Char('k') => instance.move_cursor(1.0, 0.0),
            KeyCode::Down | KeyCode::Char('j') => instance.move_cursor(-1.0, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let focus = instance.cursor;
                instance.view.zoom_in(focus);
            }
            KeyCode::Char('-') => instance.view.zoom_out(),
            KeyCode::Char('0') => instance.view = MapView::world(),
            KeyCode::Enter => {
                let cursor = instance.cursor;
                return self.select(cursor);
            }
            _ => return None,
        }
        Some(Action::Render)
    }
}

impl Component<Action> for GeoSurface {
    type Props<'a> = GeoSurfaceProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    self.handle_click(mouse.column, mouse.row)
                }
                _ => None,
            },
            EventKind::Key(key) => self.handle_key(key.code),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Coordinates footer
        ])
        .split(area);

        let state = props.state;
        let block = Block::bordered()
            .border_style(Style::default().fg(BORDER))
            .style(Style::default().bg(BACKGROUND));
        let canvas_area = block.inner(chunks[0]);

        match self.instance.as_ref() {
            Some(instance) => {
                self.canvas_area = Some(canvas_area);
                render_map(frame, chunks[0], block, instance);
                render_status(frame, canvas_area, state);
            }
            None => {
                self.canvas_area = None;
                let placeholder = Paragraph::new(
                    Line::from(Span::styled("Map offline", Style::default().fg(MUTED))).centered(),
                )
                .block(block);
                frame.render_widget(placeholder, chunks[0]);
            }
        }

        render_footer(frame, chunks[1], state);
    }
}

fn render_map(frame: &mut Frame, area: Rect, block: Block, instance: &MapInstance) {
    let (x_bounds, y_bounds) = instance.view.bounds();
    let (_, half_lng) = instance.view.half_spans();
    let marker_radius = half_lng / 60.0;
    let resolution = MapResolution::from(instance.detail);
    let cursor = instance.cursor;

    let canvas = Canvas::default()
        .block(block)
        .background_color(BACKGROUND)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            for layer in &instance.layers {
                if *layer == MapLayer::Coastline {
                    ctx.draw(&Map {
                        color: COASTLINE,
                        resolution,
                    });
                }
            }
            ctx.layer();
            ctx.print(
                cursor.lng(),
                cursor.lat(),
                Span::styled("+", Style::default().fg(Color::Gray)),
            );
            for marker in instance.selection_markers() {
                ctx.draw(&Circle {
                    x: marker.lng(),
                    y: marker.lat(),
                    radius: marker_radius,
                    color: MARKER,
                });
                ctx.print(
                    marker.lng(),
                    marker.lat(),
                    Span::styled(
                        "◉",
                        Style::default()
                            .fg(MARKER_FILL)
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });
    frame.render_widget(canvas, area);
}

fn render_status(frame: &mut Frame, canvas_area: Rect, state: &AppState) {
    if canvas_area.height == 0 {
        return;
    }
    let text = if state.is_loading() {
        let frame_idx = state.tick_count as usize % SPINNER.len();
        format!(" {} SCANNING... ", SPINNER[frame_idx])
    } else {
        " TARGET ACQUISITION MODE ".to_string()
    };
    let width = (text.chars().count() as u16).min(canvas_area.width);
    let overlay = Rect::new(canvas_area.x, canvas_area.y, width, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(
            text,
            Style::default().fg(ACCENT).bg(Color::Black),
        )),
        overlay,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let coordinate = state.coordinate.unwrap_or_default();
    let link = if state.is_loading() { "UPLINKING" } else { "CONNECTED" };
    let footer = Line::from(vec![
        Span::styled(" LAT: ", Style::default().fg(MUTED)),
        Span::raw(format!("{:.4}", coordinate.lat())),
        Span::styled("  LNG: ", Style::default().fg(MUTED)),
        Span::raw(format!("{:.4}", coordinate.lng())),
        Span::raw("  "),
        Span::styled(link, Style::default().fg(ACCENT)),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}
