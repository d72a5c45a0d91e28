use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// First minute of the timeline (06:00)
pub const TIMELINE_START_MINUTE: u32 = 360;
/// One past the last minute of the timeline (06:00 the next day)
pub const TIMELINE_END_MINUTE: u32 = 1800;
/// Number of hour rows on the timeline
pub const TOTAL_HOURS: u32 = 24;
/// Horizontal lanes per hour row
pub const CELLS_PER_ROW: u8 = 6;
/// Lane placement given to every block created by a drop
pub const DROP_CELL_START: u8 = 1;
pub const DROP_CELL_SPAN: u8 = 4;

pub type SubjectId = String;
pub type TodoId = String;
pub type BlockId = String;

/// A study subject (groups todos, carries the color)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    /// Hex color like `#86EFAC`
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub subject_id: SubjectId,
    pub content: String,
    pub is_completed: bool,
}

/// Which timeline column a block lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Plan,
    Done,
}

impl BlockKind {
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Plan => "plan",
            BlockKind::Done => "done",
        }
    }

    pub fn parse_kind(s: &str) -> Option<BlockKind> {
        match s {
            "plan" => Some(BlockKind::Plan),
            "done" => Some(BlockKind::Done),
            _ => None,
        }
    }
}

/// An entry on the plan/done time grid.
///
/// `start_time`/`end_time` are minutes since midnight inside
/// `[TIMELINE_START_MINUTE, TIMELINE_END_MINUTE]`. The lane fields are
/// independent of time: they only place the block horizontally inside its
/// hour row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBlock {
    pub id: BlockId,
    pub todo_id: Option<TodoId>,
    pub subject_id: Option<SubjectId>,
    pub start_time: u32,
    pub end_time: u32,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_start: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_span: Option<u8>,
}

impl TimelineBlock {
    pub fn from_new(id: BlockId, new: NewTimelineBlock) -> Self {
        TimelineBlock {
            id,
            todo_id: new.todo_id,
            subject_id: new.subject_id,
            start_time: new.start_time,
            end_time: new.end_time,
            kind: new.kind,
            label: new.label,
            color: new.color,
            cell_start: new.cell_start,
            cell_span: new.cell_span,
        }
    }

    pub fn duration(&self) -> u32 {
        self.end_time.saturating_sub(self.start_time)
    }

    /// Hour row (0 = 06:00) the block starts in
    pub fn row(&self) -> u32 {
        self.start_time.saturating_sub(TIMELINE_START_MINUTE) / 60
    }

    /// Lane placement, falling back to the full row when unset
    pub fn lanes(&self) -> (u8, u8) {
        let start = self.cell_start.unwrap_or(0).min(CELLS_PER_ROW - 1);
        let span = self
            .cell_span
            .unwrap_or(CELLS_PER_ROW)
            .clamp(1, CELLS_PER_ROW - start);
        (start, span)
    }
}

/// A timeline block before the store assigns it an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimelineBlock {
    pub todo_id: Option<TodoId>,
    pub subject_id: Option<SubjectId>,
    pub start_time: u32,
    pub end_time: u32,
    pub kind: BlockKind,
    pub label: Option<String>,
    pub color: Option<String>,
    pub cell_start: Option<u8>,
    pub cell_span: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dday {
    pub label: String,
    pub target_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyInfo {
    pub date: NaiveDate,
    pub dday: Option<Dday>,
    #[serde(default)]
    pub daily_quote: String,
}

impl DailyInfo {
    pub fn empty(date: NaiveDate) -> Self {
        DailyInfo {
            date,
            dday: None,
            daily_quote: String::new(),
        }
    }
}

/// Everything stored for one calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlannerData {
    pub daily_info: DailyInfo,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub todos: Vec<Todo>,
    #[serde(default)]
    pub timeline_blocks: Vec<TimelineBlock>,
}

impl DailyPlannerData {
    pub fn empty(date: NaiveDate) -> Self {
        DailyPlannerData {
            daily_info: DailyInfo::empty(date),
            subjects: Vec::new(),
            todos: Vec::new(),
            timeline_blocks: Vec::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.daily_info.date
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn todo(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn block(&self, id: &str) -> Option<&TimelineBlock> {
        self.timeline_blocks.iter().find(|b| b.id == id)
    }

    /// Todos belonging to a subject, in insertion order
    pub fn todos_for<'a>(&'a self, subject_id: &'a str) -> impl Iterator<Item = &'a Todo> + 'a {
        self.todos.iter().filter(move |t| t.subject_id == subject_id)
    }
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub content: Option<String>,
    pub is_completed: Option<bool>,
}

/// Partial update of a block. Double options distinguish "leave alone"
/// (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPatch {
    pub start_time: Option<u32>,
    pub end_time: Option<u32>,
    pub kind: Option<BlockKind>,
    pub label: Option<Option<String>>,
    pub color: Option<Option<String>>,
    pub cell_start: Option<u8>,
    pub cell_span: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyInfoPatch {
    pub dday: Option<Option<Dday>>,
    pub daily_quote: Option<String>,
}
