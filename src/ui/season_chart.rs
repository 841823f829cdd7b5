//! Seasons screen rendering
//!
//! Line chart of every winter's average under both definitions, one point
//! per year.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph},
    Frame,
};

use crate::app::App;
use crate::winter::WinterDefinition;

/// Color used for the meteorological series across all screens
pub const METEOROLOGICAL_COLOR: Color = Color::Cyan;
/// Color used for the astronomical series across all screens
pub const ASTRONOMICAL_COLOR: Color = Color::LightRed;

/// Renders the seasons chart into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Winter Temperature Comparison ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let series = app.season_series();
    let (Some((first_year, last_year)), Some((coldest, warmest))) =
        (series.year_bounds(), series.temperature_bounds())
    else {
        let empty = Paragraph::new("No winter averages available")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let x_bounds = pad_bounds(first_year, last_year, 1.0);
    let y_bounds = pad_bounds(coldest.floor(), warmest.ceil(), 1.0);

    let datasets = vec![
        Dataset::default()
            .name(format!("{} Winter (°C)", WinterDefinition::Meteorological.label()))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(METEOROLOGICAL_COLOR))
            .data(&series.meteorological),
        Dataset::default()
            .name(format!("{} Winter (°C)", WinterDefinition::Astronomical.label()))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(ASTRONOMICAL_COLOR))
            .data(&series.astronomical),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .legend_position(Some(LegendPosition::TopLeft))
        .x_axis(
            Axis::default()
                .title("Year")
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(year_labels(x_bounds)),
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

/// Widens a range by `pad` on both sides
pub fn pad_bounds(low: f64, high: f64, pad: f64) -> [f64; 2] {
    [low - pad, high + pad]
}

fn year_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let [low, high] = bounds;
    let mid = ((low + high) / 2.0).round();
    [low, mid, high]
        .iter()
        .map(|year| Span::raw(format!("{:.0}", year)))
        .collect()
}

/// Low, zero (when in range) and high labels for a temperature axis
pub fn temperature_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let [low, high] = bounds;
    let mut values = vec![low];
    if low < 0.0 && high > 0.0 {
        values.push(0.0);
    }
    values.push(high);
    values
        .into_iter()
        .map(|t| {
            let style = if t == 0.0 {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Span::styled(format!("{:.0}", t), style)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::buffer_text;
    use crate::ui::test_support::{empty_app, loaded_app};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, app, frame.area()))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_renders_title_and_axes() {
        let content = draw(&loaded_app());

        assert!(content.contains("Winter Temperature Comparison"));
        assert!(content.contains("Year"));
        assert!(content.contains("2022"));
        assert!(content.contains("2026"));
    }

    #[test]
    fn test_renders_placeholder_without_data() {
        let content = draw(&empty_app());
        assert!(content.contains("No winter averages available"));
    }

    #[test]
    fn test_pad_bounds() {
        assert_eq!(pad_bounds(2001.0, 2025.0, 1.0), [2000.0, 2026.0]);
    }

    #[test]
    fn test_temperature_labels_include_zero_when_spanning_freezing() {
        let labels: Vec<String> = temperature_labels([-7.0, 2.0])
            .into_iter()
            .map(|s| s.content.to_string())
            .collect();
        assert_eq!(labels, vec!["-7", "0", "2"]);

        let labels: Vec<String> = temperature_labels([-9.0, -1.0])
            .into_iter()
            .map(|s| s.content.to_string())
            .collect();
        assert_eq!(labels, vec!["-9", "-1"]);
    }
}
