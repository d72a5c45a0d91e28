use chrono::{Days, Local, Timelike};
use crossterm::event::{KeyCode, KeyEvent};

use crate::gesture::drag_session::DragPayload;
use crate::gesture::task_list::{RowKey, TaskListAction};
use crate::gesture::timeline::{TimelineAction, dropped_block};
use crate::model::palette::DEFAULT_BLOCK_COLOR;
use crate::model::planner::{BlockKind, TIMELINE_START_MINUTE, TOTAL_HOURS};
use crate::tui::app::{App, PromptKind};

/// Row a keyboard placement lands on when the day is not today (09:00)
const DEFAULT_PLACE_ROW: u32 = 3;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Cursor
        KeyCode::Char('j') | KeyCode::Down => {
            app.cursor += 1;
            app.clamp_cursor();
        }
        KeyCode::Char('k') | KeyCode::Up => app.cursor = app.cursor.saturating_sub(1),
        KeyCode::Char('g') => app.cursor = 0,
        KeyCode::Char('G') => {
            app.cursor = usize::MAX;
            app.clamp_cursor();
        }

        // Row actions
        KeyCode::Enter | KeyCode::Char(' ') => match app.cursor_row() {
            Some(RowKey::Todo(id)) => app.apply_task_action(TaskListAction::ToggleComplete(id)),
            Some(RowKey::Subject(id)) => app.apply_task_action(TaskListAction::ToggleExpand(id)),
            None => {}
        },
        KeyCode::Char('e') => {
            if let Some(row) = app.cursor_row() {
                app.begin_inline_edit(row);
            }
        }
        KeyCode::Char('x') => {
            if let Some(row) = app.cursor_row() {
                app.apply_task_action(TaskListAction::Delete(row));
            }
        }
        KeyCode::Char('A') => app.open_prompt(PromptKind::AddSubject),
        KeyCode::Char('a') => match cursor_subject(app) {
            Some(subject_id) => app.open_prompt(PromptKind::AddTodo(subject_id)),
            None => app.open_prompt(PromptKind::AddSubject),
        },
        KeyCode::Char('p') => place_cursor_todo(app, BlockKind::Plan),
        KeyCode::Char('f') => place_cursor_todo(app, BlockKind::Done),

        // Timeline
        KeyCode::Delete | KeyCode::Backspace => {
            if let Some(action) = app.timeline.delete_selected() {
                app.apply_timeline_action(action);
            }
        }
        KeyCode::Esc => {
            app.tasks.close_reveal();
            app.timeline.clear_selection();
        }

        // Daily info
        KeyCode::Char('Q') => app.open_prompt(PromptKind::Quote),
        KeyCode::Char('d') => app.open_prompt(PromptKind::Dday),

        // Date
        KeyCode::Char('[') | KeyCode::Char('h') => {
            if let Some(prev) = app.date().checked_sub_days(Days::new(1)) {
                app.change_date(prev);
            }
        }
        KeyCode::Char(']') | KeyCode::Char('l') => {
            if let Some(next) = app.date().checked_add_days(Days::new(1)) {
                app.change_date(next);
            }
        }
        KeyCode::Char('t') => app.change_date(Local::now().date_naive()),

        _ => {}
    }
}

/// Subject of the cursor row (the row itself, or the todo's parent)
fn cursor_subject(app: &App) -> Option<String> {
    match app.cursor_row()? {
        RowKey::Subject(id) => Some(id),
        RowKey::Todo(id) => app.store.data().todo(&id).map(|t| t.subject_id.clone()),
    }
}

/// Keyboard stand-in for dragging a todo onto the timeline: drops it on
/// the current hour when viewing today.
fn place_cursor_todo(app: &mut App, kind: BlockKind) {
    let Some(RowKey::Todo(id)) = app.cursor_row() else {
        return;
    };
    let data = app.store.data();
    let Some(todo) = data.todo(&id) else {
        return;
    };
    let color = data
        .subject(&todo.subject_id)
        .map(|s| s.color.clone())
        .unwrap_or_else(|| DEFAULT_BLOCK_COLOR.to_string());
    let payload = DragPayload {
        todo_id: todo.id.clone(),
        subject_id: todo.subject_id.clone(),
        color,
        content: todo.content.clone(),
    };
    let now = Local::now();
    let row = if now.date_naive() == app.date() {
        (now.hour() + 24 - TIMELINE_START_MINUTE / 60) % TOTAL_HOURS
    } else {
        DEFAULT_PLACE_ROW
    };
    app.apply_timeline_action(TimelineAction::Create(dropped_block(&payload, kind, row)));
}
