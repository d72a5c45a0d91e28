pub mod header;
pub mod helpers;
pub mod status_row;
pub mod task_pane;
pub mod timeline_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, Paragraph};

use crate::util::unicode;

use super::app::App;

/// Main render function. Rebuilds the hit map as a side effect.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    app.hits.clear();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (3 rows) | body | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(app.config.ui.tasks_width_percent.min(80)),
            Constraint::Min(1),
        ])
        .split(chunks[1]);

    task_pane::render_task_pane(frame, app, body[0]);
    timeline_view::render_timeline(frame, app, body[1]);

    // The dragged todo follows the pointer on top of everything
    render_drag_ghost(frame, app, area);

    status_row::render_status_row(frame, app, chunks[2]);
}

fn render_drag_ghost(frame: &mut Frame, app: &App, area: Rect) {
    let Some(session) = app.drag.session() else {
        return;
    };
    let (col, line) = app.to_cell(session.position);
    if line >= area.y + area.height || col >= area.x + area.width {
        return;
    }
    let text = format!(" {} ", session.payload.content);
    let width = (unicode::display_width(&text) as u16).min(area.x + area.width - col);
    let style = Style::default()
        .fg(app.theme.block_text)
        .bg(app.theme.swatch(&session.payload.color));
    frame.render_widget(
        Paragraph::new(Span::styled(
            unicode::truncate_to_width(&text, width as usize),
            style,
        )),
        Rect::new(col, line, width, 1),
    );
}
