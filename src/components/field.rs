use crate::state::game_clock::Possession;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::text::{Line, Span};
use tui::widgets::Widget;

/// ASCII sideline view of the field. The possessing team always drives left
/// to right, toward the opponent end zone on the right edge; `yard_line` is
/// yards left to that end zone.
pub struct FieldView {
    pub yard_line: u8,
    pub distance: u8,
    pub down: u8,
    pub possession: Possession,
    pub red_zone: bool,
    pub goal_to_go: bool,
}

const MIN_WIDTH: u16 = 30;
const END_ZONE_COLS: u16 = 3;

impl Widget for FieldView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < MIN_WIDTH || area.height < 5 {
            render_line(
                Line::from(format!(
                    " ball at the {} | {} to go ",
                    self.yard_line, self.distance
                )),
                area,
                buf,
            );
            return;
        }

        let playing_width = area.width - 2 * END_ZONE_COLS;
        let ball_col = field_column(self.yard_line, playing_width);
        let marker_col = first_down_column(self.yard_line, self.distance, playing_width);

        let mid_y = area.y + area.height / 2;
        let field_color = if self.red_zone { Color::Red } else { Color::Green };

        for y in area.y..area.y + area.height {
            // Top and bottom sidelines.
            if y == area.y || y == area.y + area.height - 1 {
                let sideline: String = "─".repeat(area.width as usize);
                buf.set_string(area.x, y, sideline, Style::default().fg(field_color));
                continue;
            }

            for col in 0..area.width {
                let x = area.x + col;
                let in_left_end_zone = col < END_ZONE_COLS;
                let in_right_end_zone = col >= area.width - END_ZONE_COLS;

                if in_left_end_zone || in_right_end_zone {
                    buf.set_string(x, y, "▒", Style::default().fg(Color::DarkGray));
                    continue;
                }

                let field_col = col - END_ZONE_COLS;
                if Some(field_col) == marker_col {
                    buf.set_string(x, y, "┊", Style::default().fg(Color::Yellow));
                } else if is_yard_stripe(field_col, playing_width) {
                    buf.set_string(x, y, "│", Style::default().fg(Color::DarkGray));
                }
            }
        }

        // Ball marker on the midline, drawn last so it wins over stripes.
        let ball_x = area.x + END_ZONE_COLS + ball_col;
        let ball = match self.possession {
            Possession::Home => "●",
            Possession::Away => "○",
        };
        buf.set_string(ball_x, mid_y, ball, Style::default().fg(Color::White));

        let caption = if self.goal_to_go {
            format!(" {} & Goal at the {} ", ordinal_word(self.down), self.yard_line)
        } else {
            format!(
                " {} & {} at the {} ",
                ordinal_word(self.down),
                self.distance,
                self.yard_line
            )
        };
        let caption_area = Rect::new(
            area.x + END_ZONE_COLS,
            area.y + area.height - 1,
            playing_width,
            1,
        );
        render_line(
            Line::from(Span::styled(caption, Style::default().fg(Color::Gray))),
            caption_area,
            buf,
        );
    }
}

/// Map yards-to-goal onto a column: 100 (own end zone) lands at column 0,
/// 0 (opponent goal line) at the rightmost playing column.
fn field_column(yard_line: u8, playing_width: u16) -> u16 {
    let yards_gained = u32::from(100u8.saturating_sub(yard_line.min(100)));
    let col = yards_gained * u32::from(playing_width.saturating_sub(1)) / 100;
    col as u16
}

/// Column of the first-down stripe, or None when the line to gain is in the
/// end zone (goal-to-go).
fn first_down_column(yard_line: u8, distance: u8, playing_width: u16) -> Option<u16> {
    if distance >= yard_line {
        return None;
    }
    Some(field_column(yard_line - distance, playing_width))
}

fn is_yard_stripe(col: u16, playing_width: u16) -> bool {
    if playing_width < 11 {
        return false;
    }
    // A stripe every 10 yards.
    (0..=10).any(|tenth| col == tenth * playing_width.saturating_sub(1) / 10)
}

fn ordinal_word(down: u8) -> &'static str {
    match down {
        1 => "1st",
        2 => "2nd",
        3 => "3rd",
        _ => "4th",
    }
}

fn render_line(line: Line, area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    buf.set_line(area.x, area.y, &line, area.width);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_column_spans_the_playing_width() {
        assert_eq!(field_column(100, 80), 0);
        assert_eq!(field_column(0, 80), 79);
        assert_eq!(field_column(50, 80), 39);
    }

    #[test]
    fn first_down_stripe_sits_ahead_of_the_ball() {
        let ball = field_column(42, 80);
        let stripe = first_down_column(42, 2, 80).expect("line to gain on the field");
        assert!(stripe > ball);
    }

    #[test]
    fn goal_to_go_has_no_stripe() {
        assert_eq!(first_down_column(4, 4, 80), None);
        assert_eq!(first_down_column(3, 8, 80), None);
    }
}
