//! UI rendering module for the winter temperature viewer
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod season_chart;
pub mod widgets;
pub mod winner;
pub mod winter_overlay;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, AppState};

pub use help_overlay::render as render_help_overlay;

/// Height of the winner panel below the chart
const WINNER_PANEL_HEIGHT: u16 = 7;

/// Renders the UI based on the current application state
pub fn render(frame: &mut Frame, app: &App) {
    if app.state == AppState::Loading {
        render_loading(frame);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),                   // Header
            Constraint::Min(8),                      // Chart
            Constraint::Length(WINNER_PANEL_HEIGHT), // Winners
            Constraint::Length(1),                   // Help text
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    match app.state {
        AppState::Overlay => winter_overlay::render(frame, app, chunks[1]),
        _ => season_chart::render(frame, app, chunks[1]),
    }
    winner::render(frame, app, chunks[2]);
    render_help(frame, app, chunks[3]);

    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Renders a loading message while data is being fetched
pub fn render_loading(frame: &mut Frame) {
    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading temperature data...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let view = match app.state {
        AppState::Overlay => "Daily comparison",
        _ => "Seasons",
    };
    let title = Line::from(vec![
        Span::styled(
            "WINTERTEMP",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  Winter Temperature Tracker  "),
        Span::styled(view, Style::default().fg(Color::Yellow)),
    ]);

    let status = match &app.error {
        Some(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            format!("Source: {}", app.source()),
            Style::default().fg(Color::DarkGray),
        )),
    };

    frame.render_widget(Paragraph::new(vec![title, status]), area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let mut help_spans = vec![
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" View  "),
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(" Winter  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Reload  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ];

    if let Some(last_refresh) = app.last_refresh {
        help_spans.push(Span::styled(
            format!(" │ Data: {}", last_refresh.format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph =
        Paragraph::new(Line::from(help_spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Collects a test buffer into one string
#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    buffer.content().iter().map(|cell| cell.symbol()).collect()
}
