use std::collections::HashSet;
use std::io;
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{
    self, DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
    EnableFocusChange, EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::gesture::drag_session::{DragCoordinator, DragEvent};
use crate::gesture::task_list::{HitArea, RowHit, RowKey, TaskListAction, TaskListController};
use crate::gesture::timeline::{BlockHit, TimelineAction, TimelineController, TimelineLayout};
use crate::gesture::{Point, Rect as PxRect};
use crate::io::kv_store::FileStore;
use crate::model::config::AppConfig;
use crate::model::planner::{DailyInfoPatch, Dday, SubjectPatch, TodoPatch};
use crate::store::PlannerStore;
use crate::util::edit_buffer::EditBuffer;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing into the inline editor or the prompt
    Edit,
}

/// What the bottom-line prompt is collecting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    AddSubject,
    /// New todo under this subject id
    AddTodo(String),
    Quote,
    /// `<label> <YYYY-MM-DD>`, empty clears
    Dday,
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            PromptKind::AddSubject => "new subject",
            PromptKind::AddTodo(_) => "new todo",
            PromptKind::Quote => "quote",
            PromptKind::Dday => "d-day (label YYYY-MM-DD)",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: EditBuffer,
}

/// Which controller received the pointer press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOwner {
    Tasks,
    Timeline,
}

// ---------------------------------------------------------------------------
// Hit map
// ---------------------------------------------------------------------------

/// Screen placement of one task list row, recorded while rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRegion {
    pub row: RowKey,
    pub y: u16,
    pub x: u16,
    pub width: u16,
    /// Column range `[start, end)` of the checkbox
    pub checkbox: Option<(u16, u16)>,
    /// First column past the label text
    pub label_end: u16,
    /// Column range `[start, end)` of the revealed delete button
    pub delete: Option<(u16, u16)>,
    /// Row is showing the inline editor
    pub input: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRegion {
    pub id: String,
    pub rect: Rect,
}

/// Terminal-cell regions of everything clickable, rebuilt every frame
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    pub rows: Vec<RowRegion>,
    pub blocks: Vec<BlockRegion>,
    /// Plan and done columns, full grid height
    pub columns: Vec<Rect>,
}

fn in_range(col: u16, range: Option<(u16, u16)>) -> bool {
    range.is_some_and(|(start, end)| col >= start && col < end)
}

impl HitMap {
    pub fn clear(&mut self) {
        self.rows.clear();
        self.blocks.clear();
        self.columns.clear();
    }

    /// Rows never overlap, so the row on a line is always the innermost one
    pub fn row_at(&self, col: u16, line: u16) -> Option<RowHit> {
        let region = self
            .rows
            .iter()
            .find(|r| r.y == line && col >= r.x && col < r.x + r.width)?;
        let area = if in_range(col, region.delete) {
            HitArea::DeleteButton
        } else if region.input {
            HitArea::Input
        } else if in_range(col, region.checkbox) {
            HitArea::Checkbox
        } else if col < region.label_end {
            HitArea::Label
        } else {
            HitArea::Body
        };
        Some(RowHit::new(region.row.clone(), area))
    }

    /// Topmost block under the cell. The outermost columns of a block
    /// are its resize handles.
    pub fn block_at(&self, col: u16, line: u16) -> Option<(String, BlockHit)> {
        let region = self.blocks.iter().rev().find(|b| {
            col >= b.rect.x
                && col < b.rect.x + b.rect.width
                && line >= b.rect.y
                && line < b.rect.y + b.rect.height
        })?;
        let hit = if region.rect.width >= 3 && col == region.rect.x {
            BlockHit::LeftHandle
        } else if region.rect.width >= 3 && col == region.rect.x + region.rect.width - 1 {
            BlockHit::RightHandle
        } else {
            BlockHit::Body
        };
        Some((region.id.clone(), hit))
    }

    pub fn in_timeline(&self, col: u16, line: u16) -> bool {
        self.columns.iter().any(|c| {
            col >= c.x && col < c.x + c.width && line >= c.y && line < c.y + c.height
        })
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Main application state
pub struct App {
    pub store: PlannerStore<FileStore>,
    pub config: AppConfig,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    pub tasks: TaskListController,
    pub timeline: TimelineController,
    pub drag: DragCoordinator,
    drag_events: Receiver<DragEvent>,
    /// Subjects whose todos are hidden
    pub collapsed: HashSet<String>,
    /// Keyboard cursor into `visible_rows()`
    pub cursor: usize,
    pub prompt: Option<Prompt>,
    pub hits: HitMap,
    pub pointer_owner: Option<PointerOwner>,
    /// Transient message for the status row
    pub status: Option<String>,
    seen_generation: u64,
}

impl App {
    pub fn new(store: PlannerStore<FileStore>, config: AppConfig) -> Self {
        let mut drag = DragCoordinator::new();
        let drag_events = drag.subscribe();
        let theme = Theme::from_config(&config.ui);
        let seen_generation = store.generation();
        App {
            tasks: TaskListController::new(config.gesture),
            timeline: TimelineController::new(config.gesture, TimelineLayout::default()),
            store,
            config,
            theme,
            mode: Mode::Navigate,
            should_quit: false,
            drag,
            drag_events,
            collapsed: HashSet::new(),
            cursor: 0,
            prompt: None,
            hits: HitMap::default(),
            pointer_owner: None,
            status: None,
            seen_generation,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.store.date()
    }

    /// Task list rows in display order
    pub fn visible_rows(&self) -> Vec<RowKey> {
        let data = self.store.data();
        let mut rows = Vec::new();
        for subject in &data.subjects {
            rows.push(RowKey::Subject(subject.id.clone()));
            if !self.collapsed.contains(&subject.id) {
                rows.extend(data.todos_for(&subject.id).map(|t| RowKey::Todo(t.id.clone())));
            }
        }
        rows
    }

    pub fn cursor_row(&self) -> Option<RowKey> {
        self.visible_rows().into_iter().nth(self.cursor)
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible_rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Terminal cell to pointer pixels (top-left corner of the cell)
    pub fn to_point(&self, col: u16, line: u16) -> Point {
        Point::new(
            f32::from(col) * self.config.ui.cell_px_width,
            f32::from(line) * self.config.ui.cell_px_height,
        )
    }

    pub fn to_px_rect(&self, r: Rect) -> PxRect {
        let p = self.to_point(r.x, r.y);
        PxRect::new(
            p.x,
            p.y,
            f32::from(r.width) * self.config.ui.cell_px_width,
            f32::from(r.height) * self.config.ui.cell_px_height,
        )
    }

    /// Pointer pixels back to the terminal cell containing them
    pub fn to_cell(&self, p: Point) -> (u16, u16) {
        let col = (p.x / self.config.ui.cell_px_width).floor().max(0.0);
        let line = (p.y / self.config.ui.cell_px_height).floor().max(0.0);
        (col as u16, line as u16)
    }

    /// Record the timeline's screen geometry. `plan`/`done` start at the
    /// first hour row and cover only the visible rows; each row is one
    /// terminal line.
    pub fn set_timeline_regions(&mut self, plan: Rect, done: Rect, trash: Rect) {
        let layout = TimelineLayout {
            plan: self.to_px_rect(plan),
            done: self.to_px_rect(done),
            trash: Some(self.to_px_rect(trash)),
            row_height: self.config.ui.cell_px_height,
        };
        self.timeline.set_layout(layout);
        self.hits.columns = vec![plan, done];
    }

    // -----------------------------------------------------------------------
    // Date
    // -----------------------------------------------------------------------

    pub fn change_date(&mut self, date: NaiveDate) {
        if self.mode == Mode::Edit {
            self.cancel_editing();
        }
        self.store.change_date(date);
        self.sync_generation();
    }

    /// Drop every piece of interaction state tied to the previous date
    fn sync_generation(&mut self) {
        if self.store.generation() == self.seen_generation {
            return;
        }
        self.seen_generation = self.store.generation();
        self.tasks.reset(&mut self.drag);
        self.timeline.reset();
        // Events from the old date's gestures are stale
        while self.drag_events.try_recv().is_ok() {}
        self.pointer_owner = None;
        self.collapsed.clear();
        self.cursor = 0;
    }

    // -----------------------------------------------------------------------
    // Pointer plumbing
    // -----------------------------------------------------------------------

    /// Deliver pending drag events to the timeline and apply what it creates
    pub fn pump_drag_events(&mut self) {
        while let Ok(event) = self.drag_events.try_recv() {
            if let Some(action) = self.timeline.handle_drag_event(event) {
                self.apply_timeline_action(action);
            }
        }
    }

    /// Abandon whatever gesture is in flight (focus lost, mode change)
    pub fn cancel_pointer(&mut self) {
        self.tasks.pointer_cancel(&mut self.drag);
        self.timeline.pointer_cancel();
        self.pointer_owner = None;
        self.pump_drag_events();
    }

    pub fn apply_task_action(&mut self, action: TaskListAction) {
        match action {
            TaskListAction::ToggleComplete(id) => self.store.toggle_todo_complete(&id),
            TaskListAction::StartEdit(row) => self.begin_inline_edit(row),
            TaskListAction::ToggleExpand(id) => {
                if !self.collapsed.remove(&id) {
                    self.collapsed.insert(id);
                }
                self.clamp_cursor();
            }
            TaskListAction::Delete(row) => {
                match &row {
                    RowKey::Subject(id) => self.store.delete_subject(id),
                    RowKey::Todo(id) => self.store.delete_todo(id),
                }
                self.timeline.forget_missing(self.store.data());
                self.clamp_cursor();
            }
            TaskListAction::CloseReveal | TaskListAction::DragReleased | TaskListAction::None => {}
        }
    }

    pub fn apply_timeline_action(&mut self, action: TimelineAction) {
        match action {
            TimelineAction::Create(new) => {
                let block = self.store.add_timeline_block(new);
                self.status = Some(format!(
                    "placed on {}",
                    block.kind.label()
                ));
            }
            TimelineAction::Update { id, patch } => self.store.update_timeline_block(&id, patch),
            TimelineAction::Delete(id) => {
                self.store.delete_timeline_block(&id);
                self.status = Some("block deleted".into());
            }
        }
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Open the inline editor on a todo (content) or subject (name)
    pub fn begin_inline_edit(&mut self, row: RowKey) {
        let data = self.store.data();
        let current = match &row {
            RowKey::Todo(id) => data.todo(id).map(|t| t.content.clone()),
            RowKey::Subject(id) => data.subject(id).map(|s| s.name.clone()),
        };
        if let Some(text) = current {
            self.tasks.begin_edit(row, &text);
            self.mode = Mode::Edit;
        }
    }

    pub fn open_prompt(&mut self, kind: PromptKind) {
        let initial = match &kind {
            PromptKind::Quote => self.store.data().daily_info.daily_quote.clone(),
            PromptKind::Dday => self
                .store
                .data()
                .daily_info
                .dday
                .as_ref()
                .map(|d| format!("{} {}", d.label, d.target_date))
                .unwrap_or_default(),
            _ => String::new(),
        };
        self.prompt = Some(Prompt {
            kind,
            buffer: EditBuffer::new(&initial),
        });
        self.mode = Mode::Edit;
    }

    /// The buffer keystrokes go to in edit mode
    pub fn edit_buffer_mut(&mut self) -> Option<&mut EditBuffer> {
        match &mut self.prompt {
            Some(prompt) => Some(&mut prompt.buffer),
            None => self.tasks.edit_buffer_mut(),
        }
    }

    pub fn commit_editing(&mut self) {
        self.mode = Mode::Navigate;
        if let Some(prompt) = self.prompt.take() {
            self.submit_prompt(prompt);
            return;
        }
        match self.tasks.commit_edit() {
            Some((RowKey::Todo(id), content)) => self.store.update_todo(
                &id,
                TodoPatch {
                    content: Some(content),
                    ..Default::default()
                },
            ),
            Some((RowKey::Subject(id), name)) => self.store.update_subject(
                &id,
                SubjectPatch {
                    name: Some(name),
                    ..Default::default()
                },
            ),
            None => {}
        }
    }

    pub fn cancel_editing(&mut self) {
        self.mode = Mode::Navigate;
        self.prompt = None;
        self.tasks.cancel_edit();
    }

    fn submit_prompt(&mut self, prompt: Prompt) {
        let text = prompt.buffer.text().trim().to_string();
        match prompt.kind {
            PromptKind::AddSubject => {
                if text.is_empty() {
                    return;
                }
                let subject = self.store.add_subject(&text);
                self.collapsed.remove(&subject.id);
            }
            PromptKind::AddTodo(subject_id) => {
                if text.is_empty() {
                    return;
                }
                if let Err(e) = self.store.add_todo(&subject_id, &text) {
                    self.status = Some(e.to_string());
                }
                self.collapsed.remove(&subject_id);
            }
            PromptKind::Quote => self.store.update_daily_info(DailyInfoPatch {
                daily_quote: Some(text),
                ..Default::default()
            }),
            PromptKind::Dday => match parse_dday_input(&text) {
                Ok(dday) => self.store.update_daily_info(DailyInfoPatch {
                    dday: Some(dday),
                    ..Default::default()
                }),
                Err(msg) => self.status = Some(msg),
            },
        }
    }
}

/// `<label> <YYYY-MM-DD>`; blank input clears the D-day
fn parse_dday_input(text: &str) -> Result<Option<Dday>, String> {
    if text.is_empty() {
        return Ok(None);
    }
    let (label, date) = text
        .rsplit_once(char::is_whitespace)
        .ok_or_else(|| "expected: label YYYY-MM-DD".to_string())?;
    let label = label.trim();
    if label.is_empty() {
        return Err("d-day label cannot be empty".into());
    }
    let target_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}'", date))?;
    Ok(Some(Dday {
        label: label.to_string(),
        target_date,
    }))
}

/// Run the TUI application
pub fn run(
    data_dir: &Path,
    config: AppConfig,
    date: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = PlannerStore::open(FileStore::open(data_dir)?, date);
    tracing::info!(dir = %data_dir.display(), %date, "starting tui");
    let mut app = App::new(store, config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableFocusChange,
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Paste(text) => input::handle_paste(app, &text),
                Event::FocusLost => app.cancel_pointer(),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
