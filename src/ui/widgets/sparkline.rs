//! Temperature sparkline widget for inline visualization

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for different temperatures (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A sparkline widget showing daily temperatures, one cell per day
///
/// Days at or above freezing use the warm style. When there are more days
/// than cells, the most recent days are shown.
pub struct TemperatureSparkline<'a> {
    /// Daily temperatures, oldest first
    temperatures: &'a [f64],
    /// Coldest temperature, drawn as the lowest block
    min: f64,
    /// Warmest temperature, drawn as the highest block
    max: f64,
    /// Index of the last observed (non-forecast) day
    last_actual: Option<usize>,
    style: Style,
    warm_style: Style,
    marker_style: Style,
}

impl<'a> TemperatureSparkline<'a> {
    pub fn new(temperatures: &'a [f64]) -> Self {
        let (min, max) = temperatures
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
                (lo.min(*t), hi.max(*t))
            });
        Self {
            temperatures,
            min,
            max,
            last_actual: None,
            style: Style::default().fg(Color::Cyan),
            warm_style: Style::default().fg(Color::LightRed),
            marker_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn last_actual(mut self, index: usize) -> Self {
        self.last_actual = Some(index);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn temperature_to_block(&self, temperature: f64) -> char {
        let range = self.max - self.min;
        if !range.is_finite() || range <= 0.0 {
            return BLOCKS[3];
        }
        let normalized = ((temperature - self.min) / range).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for TemperatureSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;
        let skip = self.temperatures.len().saturating_sub(width);

        for (i, temperature) in self.temperatures.iter().enumerate().skip(skip) {
            let block = self.temperature_to_block(*temperature);
            let x = area.x + (i - skip) as u16;
            let y = area.y;

            let style = if self.last_actual == Some(i) {
                self.marker_style
            } else if *temperature >= 0.0 {
                self.warm_style
            } else {
                self.style
            };

            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(block).set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_to_block_minimum() {
        let temps = [-10.0, 0.0];
        let sparkline = TemperatureSparkline::new(&temps);
        assert_eq!(sparkline.temperature_to_block(-10.0), '▁');
    }

    #[test]
    fn test_temperature_to_block_maximum() {
        let temps = [-10.0, 0.0];
        let sparkline = TemperatureSparkline::new(&temps);
        assert_eq!(sparkline.temperature_to_block(0.0), '█');
    }

    #[test]
    fn test_flat_series_uses_middle_block() {
        let temps = [-3.0, -3.0];
        let sparkline = TemperatureSparkline::new(&temps);
        assert_eq!(sparkline.temperature_to_block(-3.0), '▄');

        let sparkline = TemperatureSparkline::new(&[]);
        assert_eq!(sparkline.temperature_to_block(1.0), '▄');
    }

    #[test]
    fn test_out_of_range_clamps() {
        let temps = [-10.0, 0.0];
        let sparkline = TemperatureSparkline::new(&temps);
        assert_eq!(sparkline.temperature_to_block(15.0), '█');
        assert_eq!(sparkline.temperature_to_block(-30.0), '▁');
    }

    #[test]
    fn test_render_keeps_most_recent_days() {
        let temps = [-10.0, -5.0, 0.0, 5.0];
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);

        TemperatureSparkline::new(&temps)
            .last_actual(3)
            .render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "▆");
        assert_eq!(buf[(1, 0)].symbol(), "█");
        assert_eq!(buf[(1, 0)].fg, Color::Yellow);
        assert_eq!(buf[(0, 0)].fg, Color::LightRed);
    }
}
