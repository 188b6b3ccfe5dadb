use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, LineGauge, Paragraph},
};

use super::Component;
use crate::action::Action;
use crate::state::{TempUnit, WeatherSnapshot, conditions_label};

pub const NO_SIGNAL: &str = "No Signal Detected";
pub const NO_SIGNAL_ICON: &str = "\u{1f4e1}";

/// Rows used by one card including its border.
pub const CARD_HEIGHT: u16 = 5;

const CARD_BG: Color = Color::Rgb(15, 23, 42);
const CARD_BORDER: Color = Color::Rgb(30, 41, 59);
const LABEL: Color = Color::Rgb(148, 163, 184);
const MUTED: Color = Color::Rgb(100, 116, 139);
const ACCENT: Color = Color::Rgb(34, 211, 238);
const HUMIDITY_BAR: Color = Color::Rgb(59, 130, 246);

/// Current-conditions cards, or the no-signal panel when there is no data.
pub struct MetricCards;

pub struct MetricCardsProps<'a> {
    pub snapshot: Option<&'a WeatherSnapshot>,
    pub unit: TempUnit,
    pub error: Option<&'a str>,
}

impl Component<Action> for MetricCards {
    type Props<'a> = MetricCardsProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        match props.snapshot {
            Some(snapshot) => render_cards(frame, area, snapshot, props.unit),
            None => render_no_signal(frame, area, props.error),
        }
    }
}

fn card(title: &str) -> Block<'_> {
    Block::bordered()
        .title(Span::styled(title.to_uppercase(), Style::default().fg(LABEL)))
        .border_style(Style::default().fg(CARD_BORDER))
        .style(Style::default().bg(CARD_BG))
}

fn render_cards(frame: &mut Frame, area: Rect, snapshot: &WeatherSnapshot, unit: TempUnit) {
    let current = &snapshot.current;
    let cols = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);

    // Temperature
    let temperature = Paragraph::new(vec![
        Line::from(unit.format(current.temperature).bold().white()),
        Line::default(),
        Line::from(Span::styled(
            format!("Feels like {}", unit.format_short(current.apparent_temperature)),
            Style::default().fg(MUTED),
        )),
    ])
    .block(card("Temperature"));
    frame.render_widget(temperature, cols[0]);

    // Conditions
    let conditions = Paragraph::new(vec![
        Line::from(conditions_label(current.weather_code).bold().fg(ACCENT)),
        Line::default(),
        Line::from(Span::styled(
            format!("Wind: {} km/h", current.wind_speed),
            Style::default().fg(MUTED),
        )),
    ])
    .block(card("Conditions"));
    frame.render_widget(conditions, cols[1]);

    // Humidity with gauge
    let humidity_block = card("Humidity");
    let inner = humidity_block.inner(cols[2]);
    frame.render_widget(humidity_block, cols[2]);
    let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);
    frame.render_widget(
        Paragraph::new(Line::from(format!("{}%", current.humidity).bold().white())),
        rows[0],
    );
    frame.render_widget(
        LineGauge::default()
            .ratio((current.humidity / 100.0).clamp(0.0, 1.0))
            .label("")
            .filled_style(Style::default().fg(HUMIDITY_BAR))
            .unfilled_style(Style::default().fg(CARD_BORDER)),
        rows[2],
    );

    // Precipitation
    let precipitation = Paragraph::new(vec![
        Line::from(format!("{}", current.precipitation).bold().white()),
        Line::default(),
        Line::from(Span::styled("mm (Current)", Style::default().fg(MUTED))),
    ])
    .block(card("Precipitation"));
    frame.render_widget(precipitation, cols[3]);
}

fn render_no_signal(frame: &mut Frame, area: Rect, error: Option<&str>) {
    let block = Block::bordered()
        .border_style(Style::default().fg(Color::Rgb(51, 65, 85)))
        .border_type(ratatui::widgets::BorderType::Rounded);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // icon
        Constraint::Length(1), // blank
        Constraint::Length(1), // title
        Constraint::Length(1), // hint
        Constraint::Length(1), // error detail
    ])
    .flex(Flex::Center)
    .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(NO_SIGNAL_ICON).centered()),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(NO_SIGNAL.fg(Color::Rgb(203, 213, 225))).centered()),
        chunks[2],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(Span::styled(
                "Select a location on the map to initialize data stream.",
                Style::default().fg(MUTED),
            ))
            .centered(),
        ),
        chunks[3],
    );
    if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(
                Line::from(Span::styled(
                    error.to_string(),
                    Style::default().fg(Color::Rgb(200, 100, 100)),
                ))
                .centered(),
            ),
            chunks[4],
        );
    }
}
