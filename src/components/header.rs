use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;

pub const TITLE: &str = "HELIOS TRACK";
pub const SUBTITLE: &str = "PLANETARY METEOROLOGICAL GRID";

/// Ticks for the gradient seam to sweep the banner once.
pub const SWEEP_CYCLE_TICKS: u32 = 24;

pub struct Header;

pub struct HeaderProps {
    pub is_scanning: bool,
    pub tick_count: u32,
}

/// Resting colour of the banner and the colour at the centre of the scan band.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Palette {
    base: ArtColor,
    glow: ArtColor,
}

const BANNER: Palette = Palette {
    base: ArtColor::rgb(34, 211, 238),  // Cyan
    glow: ArtColor::rgb(226, 232, 240), // Slate white
};

/// Half-width of the scan band as a fraction of the banner width.
const SCAN_HALF_WIDTH: f32 = 0.18;
/// Glow left in the middle of the banner when idle.
const IDLE_GLOW: f32 = 0.35;

/// Centre of the scan band for a sweep `phase`. The band starts fully off the
/// left edge and leaves past the right edge, so no stop ever wraps.
fn band_centre(phase: f32) -> f32 {
    let travel = 1.0 + 2.0 * SCAN_HALF_WIDTH;
    -SCAN_HALF_WIDTH + phase.clamp(0.0, 1.0) * travel
}

/// Banner colour at `position` with the band centred on `centre`.
fn glow_at(palette: Palette, centre: f32, position: f32) -> ArtColor {
    let weight = 1.0 - (position - centre).abs() / SCAN_HALF_WIDTH;
    if weight <= 0.0 {
        palette.base
    } else if weight >= 1.0 {
        palette.glow
    } else {
        palette.base.interpolate(palette.glow, weight)
    }
}

/// Gradient stops for the banner: a bright band at `scan` while scanning,
/// otherwise a soft glow in the middle.
fn banner_stops(palette: Palette, scan: Option<f32>) -> Vec<(f32, ArtColor)> {
    let Some(phase) = scan else {
        let mid = palette.base.interpolate(palette.glow, IDLE_GLOW);
        return vec![(0.0, palette.base), (0.5, mid), (1.0, palette.base)];
    };
    let centre = band_centre(phase);
    let mut positions: Vec<f32> = [
        0.0,
        centre - SCAN_HALF_WIDTH,
        centre,
        centre + SCAN_HALF_WIDTH,
        1.0,
    ]
    .into_iter()
    .filter(|pos| (0.0..=1.0).contains(pos))
    .collect();
    positions.sort_by(f32::total_cmp);
    positions.dedup();
    positions
        .into_iter()
        .map(|pos| (pos, glow_at(palette, centre, pos)))
        .collect()
}

fn make_gradient(palette: Palette, angle: f32, scan: Option<f32>) -> Fill {
    let stops = banner_stops(palette, scan)
        .into_iter()
        .map(|(pos, color)| artbox::ColorStop::new(pos, color))
        .collect();
    Fill::Linear(LinearGradient::new(angle, stops))
}

fn sweep_phase(tick_count: u32) -> f32 {
    (tick_count % SWEEP_CYCLE_TICKS) as f32 / SWEEP_CYCLE_TICKS as f32
}

impl Component<Action> for Header {
    type Props<'a> = HeaderProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // FIGlet title
            Constraint::Length(1), // Subtitle
        ])
        .split(area);

        let scan = props
            .is_scanning
            .then(|| sweep_phase(props.tick_count));
        let renderer = Renderer::new(fonts::stack(&["miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(make_gradient(BANNER, 5.0, scan));
        frame.render_widget(ArtBox::new(&renderer, TITLE), chunks[0]);

        let subtitle = Line::from(vec![Span::styled(
            SUBTITLE,
            Style::default().fg(Color::Rgb(100, 116, 139)),
        )])
        .centered();
        frame.render_widget(Paragraph::new(subtitle), chunks[1]);
    }
}
