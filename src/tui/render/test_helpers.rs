use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use tempfile::TempDir;
use unicode_width::UnicodeWidthStr;

use crate::io::kv_store::FileStore;
use crate::model::config::AppConfig;
use crate::store::PlannerStore;
use crate::tui::app::App;

pub const TERM_W: u16 = 100;
pub const TERM_H: u16 = 34;

/// An app on 2026-01-24 backed by a file store in `dir`
pub fn test_app(dir: &TempDir) -> App {
    let date = NaiveDate::from_ymd_opt(2026, 1, 24).unwrap();
    let store = PlannerStore::open(FileStore::open(dir.path()).unwrap(), date);
    App::new(store, AppConfig::default())
}

/// Render the whole app into an in-memory buffer and return plain text
/// (no styles). Also refreshes `app.hits`.
pub fn render_app(app: &mut App, w: u16, h: u16) -> String {
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| super::render(frame, app)).unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let mut s = String::new();
            let mut skip = 0;
            for cell in row {
                // Cells hidden behind a wide grapheme
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                s.push_str(cell.symbol());
                skip = cell.symbol().width().saturating_sub(1);
            }
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}
