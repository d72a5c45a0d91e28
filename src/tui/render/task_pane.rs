use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::gesture::task_list::{RowKey, RowState};
use crate::ops::derive::subject_progress;
use crate::tui::app::{App, Mode, RowRegion};
use crate::util::unicode;

use super::helpers::spans_width;

/// Columns before a subject's name: ` ▾ ■ `
const SUBJECT_LABEL_COL: u16 = 5;
/// Checkbox position within a todo row
const CHECKBOX_COL: u16 = 4;
const CHECKBOX_WIDTH: u16 = 3;
/// Columns before a todo's content: `    [ ] `
const TODO_LABEL_COL: u16 = 8;

/// Render the subject/todo list and record each row's hit region
pub fn render_task_pane(frame: &mut Frame, app: &mut App, area: Rect) {
    if area.height == 0 || area.width < TODO_LABEL_COL + 2 {
        return;
    }
    let rows = app.visible_rows();
    if rows.is_empty() {
        let hint = Span::styled(
            unicode::truncate_to_width(" No subjects yet. Press A to add one.", area.width as usize),
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        );
        frame.render_widget(Paragraph::new(hint), Rect::new(area.x, area.y, area.width, 1));
        return;
    }

    // Keep the cursor row on screen
    let height = area.height as usize;
    let scroll = app.cursor.saturating_sub(height - 1);
    for (i, row) in rows.iter().enumerate().skip(scroll).take(height) {
        let line = Rect::new(area.x, area.y + (i - scroll) as u16, area.width, 1);
        if let Some(region) = render_row(frame, app, row, line, i == app.cursor) {
            app.hits.rows.push(region);
        }
    }
}

fn render_row(
    frame: &mut Frame,
    app: &App,
    row: &RowKey,
    area: Rect,
    is_cursor: bool,
) -> Option<RowRegion> {
    let theme = &app.theme;
    let data = app.store.data();
    let state = app.tasks.row_state(row);
    let row_bg = if is_cursor && app.mode == Mode::Navigate {
        theme.selection_bg
    } else {
        theme.background
    };
    let mut base = Style::default().fg(theme.text).bg(row_bg);
    if state == RowState::DraggingToTimeline {
        base = base.fg(theme.dim);
    }
    let editing = app
        .tasks
        .editing()
        .filter(|(r, _)| *r == row)
        .map(|(_, buf)| buf);

    let mut spans = Vec::new();
    let mut checkbox = None;
    let label_col = match row {
        RowKey::Subject(id) => {
            let subject = data.subject(id)?;
            let arrow = if app.collapsed.contains(id) { "▸" } else { "▾" };
            spans.push(Span::styled(format!(" {} ", arrow), base));
            spans.push(Span::styled("■ ", base.fg(theme.swatch(&subject.color))));
            if editing.is_none() {
                let (done, total) = subject_progress(data, id);
                spans.push(Span::styled(
                    subject.name.clone(),
                    base.fg(theme.text_bright).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::styled(format!("  {}/{}", done, total), base.fg(theme.dim)));
            }
            SUBJECT_LABEL_COL
        }
        RowKey::Todo(id) => {
            let todo = data.todo(id)?;
            spans.push(Span::styled(" ".repeat(CHECKBOX_COL as usize), base));
            let mark = if todo.is_completed {
                Span::styled("[x]", base.fg(theme.green))
            } else {
                Span::styled("[ ]", base)
            };
            spans.push(mark);
            spans.push(Span::styled(" ", base));
            checkbox = Some((area.x + CHECKBOX_COL, area.x + CHECKBOX_COL + CHECKBOX_WIDTH));
            if editing.is_none() {
                let style = if todo.is_completed {
                    base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    base
                };
                spans.push(Span::styled(todo.content.clone(), style));
            }
            TODO_LABEL_COL
        }
    };

    if let Some(buf) = editing {
        spans.push(Span::styled(
            buf.text().to_string(),
            base.fg(theme.text_bright).add_modifier(Modifier::UNDERLINED),
        ));
        let cursor_x = area.x + label_col + buf.cursor_col() as u16;
        if cursor_x < area.x + area.width {
            frame.set_cursor_position((cursor_x, area.y));
        }
    }
    let content_width = spans_width(&spans) as u16;

    // Swipe offset: the row slides left over the delete button
    let px = app.tasks.row_offset(row).max(0.0);
    let shift = ((px / app.config.ui.cell_px_width).round() as u16).min(area.width);
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(row_bg))
            .scroll((0, shift)),
        area,
    );

    let mut delete = None;
    if shift > 0 {
        let x = area.x + area.width - shift;
        let label = unicode::fit_to_width(" delete", shift as usize);
        frame.render_widget(
            Paragraph::new(Span::styled(
                label,
                Style::default().fg(theme.text_bright).bg(theme.red),
            )),
            Rect::new(x, area.y, shift, 1),
        );
        delete = Some((x, x + shift));
        // A slid row only answers taps by closing
        checkbox = None;
    }

    Some(RowRegion {
        row: row.clone(),
        y: area.y,
        x: area.x,
        width: area.width,
        checkbox,
        label_end: (area.x + content_width).saturating_sub(shift),
        delete,
        input: editing.is_some(),
    })
}
