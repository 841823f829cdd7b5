//! Key binding reference drawn over either view

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Binding groups in display order: title, then (keys, action) pairs
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Views",
        &[
            ("Tab", "Switch view"),
            ("1", "Seasons chart"),
            ("2", "Daily comparison"),
        ],
    ),
    (
        "Winters",
        &[("←/h", "Previous winter"), ("→/l", "Next winter")],
    ),
    (
        "Other",
        &[
            ("r", "Reload data"),
            ("?", "Toggle this help"),
            ("q/Esc", "Quit application"),
        ],
    ),
];

const KEY_COLUMN: usize = 12;
const WIDTH: u16 = 44;

pub fn render(frame: &mut Frame) {
    let lines = help_lines();
    // borders add one row above and below
    let area = centered(frame.area(), WIDTH, lines.len() as u16 + 2);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn help_lines() -> Vec<Line<'static>> {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let key = Style::default().fg(Color::Yellow);

    let mut lines = vec![Line::styled(
        "Keyboard Shortcuts",
        heading.fg(Color::Cyan),
    )];
    for (title, bindings) in SECTIONS {
        lines.push(Line::default());
        lines.push(Line::styled(*title, heading));
        lines.extend(bindings.iter().map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("  {:<width$}", keys, width = KEY_COLUMN), key),
                Span::raw(*action),
            ])
        }));
    }
    lines.push(Line::default());
    lines.push(Line::styled(
        "Press Esc or ? to close",
        Style::default().fg(Color::DarkGray),
    ));
    lines
}

/// Centers a `width` x `height` box in `area`, shrinking it to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
