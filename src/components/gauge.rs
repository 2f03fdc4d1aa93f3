use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::widgets::Widget;

/// One-line labeled probability bar: `label ████████░░░░ 61%`.
pub struct ProbabilityBar<'a> {
    pub label: &'a str,
    /// 0.0..=1.0; anything outside is clamped.
    pub value: f64,
    pub color: Color,
}

const LABEL_WIDTH: u16 = 14;
const PERCENT_WIDTH: u16 = 5;

impl Widget for ProbabilityBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < LABEL_WIDTH + PERCENT_WIDTH + 4 || area.height == 0 {
            return;
        }

        let value = self.value.clamp(0.0, 1.0);
        let label: String = self
            .label
            .chars()
            .take(LABEL_WIDTH as usize - 1)
            .collect();
        buf.set_string(
            area.x,
            area.y,
            format!("{label:<width$}", width = LABEL_WIDTH as usize),
            Style::default().fg(Color::Gray),
        );

        let bar_width = area.width - LABEL_WIDTH - PERCENT_WIDTH;
        let filled = filled_cells(value, bar_width);
        let bar: String = (0..bar_width)
            .map(|i| if i < filled { '█' } else { '░' })
            .collect();
        buf.set_string(
            area.x + LABEL_WIDTH,
            area.y,
            bar,
            Style::default().fg(self.color),
        );

        buf.set_string(
            area.x + LABEL_WIDTH + bar_width,
            area.y,
            format!(" {:>3.0}%", value * 100.0),
            Style::default().fg(Color::White),
        );
    }
}

fn filled_cells(value: f64, bar_width: u16) -> u16 {
    (value * f64::from(bar_width)).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_is_proportional() {
        assert_eq!(filled_cells(0.0, 20), 0);
        assert_eq!(filled_cells(0.5, 20), 10);
        assert_eq!(filled_cells(1.0, 20), 20);
    }

    #[test]
    fn fill_rounds_to_nearest_cell() {
        assert_eq!(filled_cells(0.61, 10), 6);
        assert_eq!(filled_cells(0.66, 10), 7);
    }
}
