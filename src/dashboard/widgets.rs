//! Reusable widgets for the heatmap dashboard.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::heatmap::{GridCell, Hsl};

/// Terminal color for an HSL heatmap color.
pub fn terminal_color(color: &Hsl) -> Color {
    let rgb = color.to_rgb();
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

// ── HeatCell ────────────────────────────────────────────────────────────────

/// One grid cell: label, value and optional raw count on the cell's color.
pub struct HeatCell<'a> {
    cell: &'a GridCell,
}

impl<'a> HeatCell<'a> {
    pub fn new(cell: &'a GridCell) -> Self {
        Self { cell }
    }
}

impl Widget for HeatCell<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let fg = if self.cell.color.prefers_dark_text() {
            Color::Black
        } else {
            Color::White
        };
        let base = Style::default().fg(fg).bg(terminal_color(&self.cell.color));

        let mut lines = vec![
            Line::styled(self.cell.label.as_str(), base.add_modifier(Modifier::DIM)),
            Line::styled(self.cell.value_text.as_str(), base.add_modifier(Modifier::BOLD)),
        ];
        if let Some(raw) = &self.cell.raw_text {
            lines.push(Line::styled(raw.as_str(), base));
        }

        Paragraph::new(lines)
            .style(base)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
