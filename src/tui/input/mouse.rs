use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::gesture::Point;
use crate::gesture::task_list::HitArea;
use crate::tui::app::{App, Mode, PointerOwner};

pub(super) fn handle_mouse(app: &mut App, event: MouseEvent) {
    let at = app.to_point(event.column, event.row);
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => pointer_down(app, event.column, event.row, at),
        MouseEventKind::Drag(MouseButton::Left) => pointer_move(app, at),
        MouseEventKind::Up(MouseButton::Left) => pointer_up(app, at),
        _ => {}
    }
}

fn pointer_down(app: &mut App, col: u16, line: u16, at: Point) {
    // The prompt keeps the keyboard; clicks wait until it closes
    if app.prompt.is_some() {
        return;
    }
    if app.pointer_owner.is_some() {
        // Lost a release somewhere; start over
        app.cancel_pointer();
    }

    let row_hit = app.hits.row_at(col, line);
    let on_input = row_hit.as_ref().is_some_and(|h| h.area == HitArea::Input);
    if app.mode == Mode::Edit && !on_input {
        // Clicking away from the inline editor commits it
        app.commit_editing();
    }

    if let Some(hit) = row_hit {
        if on_input {
            return;
        }
        if let Some(i) = app.visible_rows().iter().position(|r| *r == hit.row) {
            app.cursor = i;
        }
        app.tasks.pointer_down(hit, at, &mut app.drag);
        app.pointer_owner = Some(PointerOwner::Tasks);
        return;
    }

    app.tasks.close_reveal();
    if let Some((id, hit)) = app.hits.block_at(col, line) {
        app.timeline.pointer_down_block(&id, hit, at, app.store.data());
        app.pointer_owner = Some(PointerOwner::Timeline);
    } else if app.hits.in_timeline(col, line) {
        app.timeline.pointer_down_empty();
    }
}

fn pointer_move(app: &mut App, at: Point) {
    match app.pointer_owner {
        Some(PointerOwner::Tasks) => {
            app.tasks.pointer_move(at, app.store.data(), &mut app.drag);
            app.pump_drag_events();
        }
        Some(PointerOwner::Timeline) => app.timeline.pointer_move(at),
        None => {}
    }
}

fn pointer_up(app: &mut App, at: Point) {
    match app.pointer_owner.take() {
        Some(PointerOwner::Tasks) => {
            let action = app.tasks.pointer_up(at, &mut app.drag);
            app.pump_drag_events();
            app.apply_task_action(action);
        }
        Some(PointerOwner::Timeline) => {
            if let Some(action) = app.timeline.pointer_up(at) {
                app.apply_timeline_action(action);
            }
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::planner::BlockKind;
    use crate::tui::render::render;
    use crate::tui::render::test_helpers::test_app;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn draw(app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(100, 34)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
    }

    /// Find the screen cell of the first row region for `row`
    fn row_cell(app: &App, row: &crate::gesture::task_list::RowKey) -> (u16, u16) {
        let region = app.hits.rows.iter().find(|r| r.row == *row).unwrap();
        (region.label_end.saturating_sub(1), region.y)
    }

    #[test]
    fn dragging_a_todo_onto_the_plan_column_creates_a_block() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        let math = app.store.add_subject("Math");
        let todo = app.store.add_todo(&math.id, "Chapter 1").unwrap();
        draw(&mut app);

        let todo_row = crate::gesture::task_list::RowKey::Todo(todo.id.clone());
        let (col, line) = row_cell(&app, &todo_row);
        let plan = app.hits.columns[0];

        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), col, line));
        // Straight down first so the gesture classifies as a drag
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), col, line + 3));
        assert!(app.drag.is_active());
        handle_mouse(
            &mut app,
            mouse(MouseEventKind::Drag(MouseButton::Left), plan.x + 2, plan.y + 3),
        );
        assert!(app.timeline.preview().is_some());
        handle_mouse(
            &mut app,
            mouse(MouseEventKind::Up(MouseButton::Left), plan.x + 2, plan.y + 3),
        );

        assert!(!app.drag.is_active());
        let blocks = &app.store.data().timeline_blocks;
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Plan);
        assert_eq!((blocks[0].start_time, blocks[0].end_time), (540, 600));
        assert_eq!(blocks[0].todo_id.as_deref(), Some(todo.id.as_str()));
    }

    #[test]
    fn tapping_a_checkbox_toggles_the_todo() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        let math = app.store.add_subject("Math");
        let todo = app.store.add_todo(&math.id, "Chapter 1").unwrap();
        draw(&mut app);

        let todo_row = crate::gesture::task_list::RowKey::Todo(todo.id.clone());
        let region = app.hits.rows.iter().find(|r| r.row == todo_row).unwrap();
        let (col, line) = (region.checkbox.unwrap().0, region.y);
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), col, line));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), col, line));
        assert!(app.store.data().todo(&todo.id).unwrap().is_completed);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        draw(&mut app);
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 5, 5));
        assert_eq!(app.pointer_owner, None);
    }
}
