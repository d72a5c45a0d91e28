use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode;

use super::helpers::split_line;

const NAVIGATE_HINT: &str = "A subject  a todo  e edit  x del  p/f place  [ ] day  d d-day  Q quote  q quit";
const EDIT_HINT: &str = "Enter save  Esc cancel";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = Style::default().bg(app.theme.background);
    let width = area.width as usize;

    let line = match (&app.prompt, app.mode) {
        (Some(prompt), _) => {
            let label = format!("{}: ", prompt.kind.title());
            let cursor_x = area.x
                + (unicode::display_width(&label) + prompt.buffer.cursor_col()) as u16;
            if cursor_x < area.x + area.width {
                frame.set_cursor_position((cursor_x, area.y));
            }
            split_line(
                vec![
                    Span::styled(label, bg.fg(app.theme.highlight)),
                    Span::styled(prompt.buffer.text().to_string(), bg.fg(app.theme.text_bright)),
                ],
                vec![Span::styled(EDIT_HINT, bg.fg(app.theme.dim))],
                width,
                bg,
            )
        }
        (None, Mode::Edit) => split_line(
            Vec::new(),
            vec![Span::styled(EDIT_HINT, bg.fg(app.theme.dim))],
            width,
            bg,
        ),
        (None, Mode::Navigate) => match &app.status {
            Some(msg) => Line::from(Span::styled(
                unicode::truncate_to_width(msg, width),
                bg.fg(app.theme.yellow),
            )),
            None => Line::from(Span::styled(
                unicode::truncate_to_width(NAVIGATE_HINT, width),
                bg.fg(app.theme.dim),
            )),
        },
    };

    frame.render_widget(Paragraph::new(line).style(bg), area);
}
