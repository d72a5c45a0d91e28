use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.commit_editing();
            return;
        }
        KeyCode::Esc => {
            app.cancel_editing();
            return;
        }
        _ => {}
    }

    let Some(buf) = app.edit_buffer_mut() else {
        // Editor vanished underneath us (row deleted); leave edit mode
        app.cancel_editing();
        return;
    };
    match key.code {
        KeyCode::Backspace => buf.backspace(),
        KeyCode::Delete => buf.delete(),
        KeyCode::Left => buf.move_left(),
        KeyCode::Right => buf.move_right(),
        KeyCode::Home => buf.home(),
        KeyCode::End => buf.end(),
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => buf.home(),
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => buf.end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => buf.insert_char(c),
        _ => {}
    }
}
