//! Winner panel rendering
//!
//! One box per winter definition naming the current winner, decided by the
//! most recent winter alone, plus a sparkline of the focus winter's daily
//! temperatures.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::season_chart::{ASTRONOMICAL_COLOR, METEOROLOGICAL_COLOR};
use super::widgets::TemperatureSparkline;
use crate::app::App;
use crate::chart_data::{describe_window, format_average, Winner};
use crate::winter::{self, WinterDefinition};

/// Renders the winner boxes and the daily sparkline into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let (meteorological, astronomical) = app.latest_averages();
    render_definition(
        frame,
        app,
        WinterDefinition::Meteorological,
        meteorological,
        columns[0],
    );
    render_definition(
        frame,
        app,
        WinterDefinition::Astronomical,
        astronomical,
        columns[1],
    );

    render_daily_sparkline(frame, app, rows[1]);
}

fn render_definition(
    frame: &mut Frame,
    app: &App,
    definition: WinterDefinition,
    average: Option<f64>,
    area: Rect,
) {
    let color = match definition {
        WinterDefinition::Meteorological => METEOROLOGICAL_COLOR,
        WinterDefinition::Astronomical => ASTRONOMICAL_COLOR,
    };
    let winner = Winner::from_average(average);

    let mut lines = vec![Line::from(vec![
        Span::raw("Current winner: "),
        Span::styled(
            winner.label(&app.warm_label, &app.cold_label).to_string(),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
    ])];

    if let Some(latest) = app.latest_year.and_then(winter::winter) {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", latest.year),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                describe_window(&latest, definition),
                Style::default().fg(Color::Gray),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("({})", format_average(average)),
            Style::default().fg(color),
        )));
    }

    let block = Block::default()
        .title(format!(" {} Winter ", definition.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_daily_sparkline(frame: &mut Frame, app: &App, area: Rect) {
    let Some(overlay) = app.overlay() else {
        return;
    };
    let temperatures = overlay.focus.temperatures();
    if temperatures.is_empty() {
        return;
    }

    let label = format!("{} daily: ", overlay.focus.year);
    let label_width = label.chars().count() as u16;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(label_width), Constraint::Min(1)])
        .split(area);

    frame.render_widget(
        Paragraph::new(label).style(Style::default().fg(Color::DarkGray)),
        chunks[0],
    );

    let mut sparkline = TemperatureSparkline::new(&temperatures);
    if let Some(last) = overlay.focus.actual.len().checked_sub(1) {
        sparkline = sparkline.last_actual(last);
    }
    frame.render_widget(sparkline, chunks[1]);
}
