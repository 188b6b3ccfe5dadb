//! 24-hour temperature chart: a line over a vertical gradient fill.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Paragraph,
    },
    Frame,
};

use super::{DrawingSurface, InstanceId};
use crate::state::ChartSeries;

/// Width reserved for the y-axis labels.
const Y_AXIS_WIDTH: u16 = 5;
const Y_GRID_LINES: usize = 4;
/// Number of colour bands approximating the fill gradient.
const GRADIENT_BANDS: usize = 6;
/// Bezier samples per segment of the smoothed curve.
const CURVE_STEPS: usize = 8;
const POINT_GLYPH: &str = "○";

/// Fixed visual contract of the projection chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartStyle {
    pub line: Color,
    /// Bezier tension of the line, 0 for straight segments
    pub tension: f64,
    /// Hollow point markers: inside and ring colours
    pub point_fill: Color,
    pub point_border: Color,
    /// Gradient stops at the top and bottom of the plot
    pub gradient: (Color, Color),
    pub background: Color,
    pub x_grid: Option<Color>,
    pub y_grid: Option<Color>,
    pub ticks: Color,
    pub legend: bool,
}

impl ChartStyle {
    /// `#22d3ee` line; `rgba(34, 211, 238, 0.4 → 0.0)` fill composited over
    /// the `#020617` background.
    pub const PROJECTION: Self = Self {
        line: Color::Rgb(34, 211, 238),
        tension: 0.4,
        point_fill: Color::Rgb(2, 6, 23),
        point_border: Color::Rgb(34, 211, 238),
        gradient: (Color::Rgb(15, 88, 109), Color::Rgb(2, 6, 23)),
        background: Color::Rgb(2, 6, 23),
        x_grid: None,
        y_grid: Some(Color::Rgb(30, 41, 59)),
        ticks: Color::Rgb(100, 116, 139),
        legend: false,
    };
}

/// One chart bound to the surface. Created by [`ChartSurface::render`],
/// destroyed by the next render or by [`ChartSurface::dispose`].
#[derive(Debug)]
pub struct ChartInstance {
    id: InstanceId,
    labels: Vec<String>,
    values: Vec<f64>,
    style: ChartStyle,
}

impl ChartInstance {
    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn point_count(&self) -> usize {
        self.values.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// Padded y-axis range; `(0, 1)` when there is no data.
    pub fn y_range(&self) -> (f64, f64) {
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }
        let pad = ((max - min) * 0.1).max(1.0);
        (min - pad, max + pad)
    }

    fn x_max(&self) -> f64 {
        (self.values.len().saturating_sub(1) as f64).max(1.0)
    }

    fn points(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v))
            .collect()
    }

    /// The series as a polyline through every data point, bent by the style's
    /// tension.
    pub fn curve(&self) -> Vec<(f64, f64)> {
        smooth(&self.points(), self.style.tension, CURVE_STEPS)
    }
}

/// Cubic Bezier curve through `points`. Each point gets control handles
/// along the chord between its neighbours, split by the neighbour distances.
fn smooth(points: &[(f64, f64)], tension: f64, steps: usize) -> Vec<(f64, f64)> {
    if points.len() < 2 || tension <= 0.0 || steps == 0 {
        return points.to_vec();
    }
    let last = points.len() - 1;
    let handles: Vec<_> = (0..points.len())
        .map(|i| {
            let cur = points[i];
            let prev = points[i.saturating_sub(1)];
            let next = points[(i + 1).min(last)];
            let d01 = (cur.0 - prev.0).hypot(cur.1 - prev.1);
            let d12 = (next.0 - cur.0).hypot(next.1 - cur.1);
            let total = d01 + d12;
            if total == 0.0 {
                return (cur, cur);
            }
            let (fa, fb) = (tension * d01 / total, tension * d12 / total);
            let (dx, dy) = (next.0 - prev.0, next.1 - prev.1);
            ((cur.0 - fa * dx, cur.1 - fa * dy), (cur.0 + fb * dx, cur.1 + fb * dy))
        })
        .collect();

    let mut curve = Vec::with_capacity(last * steps + 1);
    curve.push(points[0]);
    for i in 0..last {
        let (p0, c0, c1, p1) = (points[i], handles[i].1, handles[i + 1].0, points[i + 1]);
        for step in 1..=steps {
            let t = step as f64 / steps as f64;
            let u = 1.0 - t;
            let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
            curve.push((
                a * p0.0 + b * c0.0 + c * c1.0 + d * p1.0,
                a * p0.1 + b * c0.1 + c * c1.1 + d * p1.1,
            ));
        }
    }
    curve
}

/// Height of the polyline at `x`, or `None` outside it.
fn height_at(curve: &[(f64, f64)], x: f64) -> Option<f64> {
    let first = curve.first()?;
    let last = curve.last()?;
    if x <= first.0 {
        return Some(first.1);
    }
    if x >= last.0 {
        return Some(last.1);
    }
    let j = curve.partition_point(|p| p.0 < x);
    let (a, b) = (curve[j - 1], curve[j]);
    let t = if b.0 > a.0 { (x - a.0) / (b.0 - a.0) } else { 0.0 };
    Some(a.1 + (b.1 - a.1) * t)
}

#[derive(Debug, Default)]
pub struct ChartSurface {
    surface: DrawingSurface,
    instance: Option<ChartInstance>,
}

impl ChartSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instance(&self) -> Option<&ChartInstance> {
        self.instance.as_ref()
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    /// Replace the bound chart with one for `series`.
    pub fn render(&mut self, series: &ChartSeries) {
        self.dispose();
        let id = self.surface.bind();
        let (labels, values) = series
            .points
            .iter()
            .map(|p| (p.hour_label.clone(), p.temperature))
            .unzip();
        self.instance = Some(ChartInstance {
            id,
            labels,
            values,
            style: ChartStyle::PROJECTION,
        });
        tracing::debug!(?id, points = series.len(), "chart rendered");
    }

    /// Destroy the bound chart, if any.
    pub fn dispose(&mut self) {
        if let Some(instance) = self.instance.take() {
            self.surface.release(instance.id);
        }
    }

    /// Paint the bound chart into `area`. Nothing is drawn when no chart is
    /// bound.
    pub fn draw(&mut self, frame: &mut Frame, area: Rect) {
        self.surface.mount(area);
        let Some(instance) = self.instance.as_ref() else {
            return;
        };
        if area.width <= Y_AXIS_WIDTH || area.height < 2 {
            return;
        }

        let rows = Layout::vertical([
            Constraint::Fill(1),   // Plot
            Constraint::Length(1), // Hour labels
        ])
        .split(area);
        let cols = Layout::horizontal([
            Constraint::Length(Y_AXIS_WIDTH), // Temperature labels
            Constraint::Fill(1),              // Canvas
        ])
        .split(rows[0]);

        render_y_axis(frame, cols[0], instance);
        render_plot(frame, cols[1], instance);

        let label_area = Rect::new(cols[1].x, rows[1].y, cols[1].width, 1);
        let labels = x_axis_line(instance.labels(), label_area.width);
        frame.render_widget(
            Paragraph::new(labels).style(Style::default().fg(instance.style.ticks)),
            label_area,
        );
    }
}

fn render_y_axis(frame: &mut Frame, area: Rect, instance: &ChartInstance) {
    if instance.point_count() == 0 || area.height == 0 {
        return;
    }
    let (lo, hi) = instance.y_range();
    let style = Style::default().fg(instance.style.ticks);
    let top = Rect::new(area.x, area.y, area.width, 1);
    let bottom = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
    frame.render_widget(
        Paragraph::new(format!("{:.0}°", hi))
            .style(style)
            .alignment(Alignment::Right),
        top,
    );
    frame.render_widget(
        Paragraph::new(format!("{:.0}°", lo))
            .style(style)
            .alignment(Alignment::Right),
        bottom,
    );
}

fn render_plot(frame: &mut Frame, area: Rect, instance: &ChartInstance) {
    let style = instance.style;
    let (lo, hi) = instance.y_range();
    let x_max = instance.x_max();
    let samples = (usize::from(area.width) * 2).max(2);
    let points = instance.points();
    let curve = instance.curve();
    let marker = Style::default().fg(style.point_border).bg(style.point_fill);

    let canvas = Canvas::default()
        .background_color(style.background)
        .marker(Marker::Braille)
        .x_bounds([0.0, x_max])
        .y_bounds([lo, hi])
        .paint(move |ctx| {
            if let Some(grid) = style.y_grid {
                for i in 0..=Y_GRID_LINES {
                    let y = lo + (hi - lo) * i as f64 / Y_GRID_LINES as f64;
                    ctx.draw(&CanvasLine {
                        x1: 0.0,
                        y1: y,
                        x2: x_max,
                        y2: y,
                        color: grid,
                    });
                }
            }
            if points.is_empty() {
                return;
            }
            ctx.layer();

            // Gradient fill, banded by absolute height like a canvas gradient
            let band = (hi - lo) / GRADIENT_BANDS as f64;
            for s in 0..=samples {
                let x = x_max * s as f64 / samples as f64;
                let Some(y) = height_at(&curve, x) else {
                    continue;
                };
                for b in 0..GRADIENT_BANDS {
                    let band_lo = lo + band * b as f64;
                    if y <= band_lo {
                        break;
                    }
                    let t = (b as f64 + 0.5) / GRADIENT_BANDS as f64;
                    ctx.draw(&CanvasLine {
                        x1: x,
                        y1: band_lo,
                        x2: x,
                        y2: y.min(band_lo + band),
                        color: lerp_color(style.gradient.1, style.gradient.0, t),
                    });
                }
            }
            ctx.layer();

            for pair in curve.windows(2) {
                ctx.draw(&CanvasLine {
                    x1: pair[0].0,
                    y1: pair[0].1,
                    x2: pair[1].0,
                    y2: pair[1].1,
                    color: style.line,
                });
            }
            for &(x, y) in &points {
                ctx.print(x, y, Span::styled(POINT_GLYPH, marker));
            }
        });
    frame.render_widget(canvas, area);
}

/// Spread hour labels across `width` columns. The final label is always
/// placed; the others are skipped when they would overlap a neighbour.
fn x_axis_line(labels: &[String], width: u16) -> String {
    let width = usize::from(width);
    if labels.is_empty() || width == 0 {
        return String::new();
    }
    let mut line = vec![' '; width];
    let last = labels.len() - 1;
    let span = last.max(1) as f64;
    let slot = |i: usize, len: usize| -> Option<usize> {
        if len > width {
            return None;
        }
        let centre = (i as f64 / span * (width - 1) as f64).round() as usize;
        Some(centre.saturating_sub(len / 2).min(width - len))
    };
    let mut write = |start: usize, label: &str| {
        for (offset, ch) in label.chars().enumerate() {
            line[start + offset] = ch;
        }
    };

    let mut limit = width;
    if last > 0 {
        let label = &labels[last];
        if let Some(start) = slot(last, label.chars().count()) {
            write(start, label);
            limit = start.saturating_sub(1);
        }
    }

    let mut next_free = 0usize;
    for (i, label) in labels.iter().enumerate().take(last.max(1)) {
        let len = label.chars().count();
        let Some(start) = slot(i, len) else {
            continue;
        };
        if start < next_free || start + len > limit {
            continue;
        }
        write(start, label);
        next_free = start + len + 1;
    }
    line.into_iter().collect::<String>().trim_end().to_string()
}

fn lerp_color(from: Color, to: Color, t: f64) -> Color {
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}
