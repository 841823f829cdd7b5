//! Daily comparison screen rendering
//!
//! Lays the focus winter and the winter before it over a shared Dec 1 to
//! Mar 25 axis. Days after the last load are drawn as forecast points. The
//! focus winter's meteorological average is a horizontal line and its
//! season boundaries are vertical lines.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph},
    Frame,
};

use super::season_chart::{
    pad_bounds, temperature_labels, ASTRONOMICAL_COLOR, METEOROLOGICAL_COLOR,
};
use crate::app::App;
use crate::chart_data::{overlay_axis_labels, Overlay, OVERLAY_LAST_DAY};

const FORECAST_COLOR: Color = Color::Magenta;
const AVERAGE_COLOR: Color = Color::Gray;
const MARKER_COLOR: Color = Color::Yellow;

/// Renders the overlay chart into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Daily Temperature Comparison ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(overlay) = app.overlay() else {
        let empty = Paragraph::new("No winter selected")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    render_chart(frame, &overlay, block, chunks[0]);
    render_marker_caption(frame, &overlay, chunks[1]);
}

fn render_chart(frame: &mut Frame, overlay: &Overlay, block: Block, area: Rect) {
    let (coldest, warmest) = overlay.temperature_bounds().unwrap_or((-10.0, 5.0));
    let y_bounds = pad_bounds(coldest.floor(), warmest.ceil(), 1.0);
    let x_bounds = [0.0, OVERLAY_LAST_DAY];

    let average_line: Vec<(f64, f64)> = overlay
        .average
        .map(|avg| vec![(x_bounds[0], avg), (x_bounds[1], avg)])
        .unwrap_or_default();
    let marker_lines: Vec<[(f64, f64); 2]> = overlay
        .markers
        .iter()
        .map(|m| [(m.x, y_bounds[0]), (m.x, y_bounds[1])])
        .collect();

    let focus_year = overlay.focus.year;
    let mut datasets = Vec::new();

    if let Some(previous) = &overlay.previous {
        datasets.push(
            Dataset::default()
                .name(format!("{} Winter", previous.year))
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(METEOROLOGICAL_COLOR))
                .data(&previous.actual),
        );
    }

    datasets.push(
        Dataset::default()
            .name(format!("{} Winter (Actual)", focus_year))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(ASTRONOMICAL_COLOR))
            .data(&overlay.focus.actual),
    );

    if !overlay.focus.forecast.is_empty() {
        datasets.push(
            Dataset::default()
                .name(format!("{} Winter (Forecast)", focus_year))
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(FORECAST_COLOR))
                .data(&overlay.focus.forecast),
        );
    }

    if !average_line.is_empty() {
        datasets.push(
            Dataset::default()
                .name(format!("{} Avg Temp", focus_year))
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(AVERAGE_COLOR))
                .data(&average_line),
        );
    }

    for line in &marker_lines {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(MARKER_COLOR))
                .data(line),
        );
    }

    let x_labels: Vec<Span> = overlay_axis_labels().into_iter().map(Span::raw).collect();

    let chart = Chart::new(datasets)
        .block(block)
        .legend_position(Some(LegendPosition::TopRight))
        .x_axis(
            Axis::default()
                .title("Date")
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Temperature (°C)")
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(temperature_labels(y_bounds)),
        );

    frame.render_widget(chart, area);
}

/// One line naming each vertical marker
fn render_marker_caption(frame: &mut Frame, overlay: &Overlay, area: Rect) {
    let mut spans = Vec::new();
    for (i, marker) in overlay.markers.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled("┊ ", Style::default().fg(MARKER_COLOR)));
        spans.push(Span::raw(marker.label.clone()));
    }
    if let Some(avg) = overlay.average {
        spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            format!("Avg {:.1}°C", avg),
            Style::default().fg(AVERAGE_COLOR),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
