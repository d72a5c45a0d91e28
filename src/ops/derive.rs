//! Pure derivations over planner data: totals, D-day arithmetic, labels.

use chrono::{Datelike, NaiveDate};

use crate::model::palette::DEFAULT_BLOCK_COLOR;
use crate::model::planner::{
    BlockKind, DailyPlannerData, Subject, TIMELINE_START_MINUTE, TimelineBlock,
};

const KOREAN_WEEKDAYS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

/// Minutes recorded in the done column
pub fn study_minutes(blocks: &[TimelineBlock]) -> u32 {
    blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Done)
        .map(TimelineBlock::duration)
        .sum()
}

/// Whole days from `today` until `target` (negative once the target has passed)
pub fn dday_value(today: NaiveDate, target: NaiveDate) -> i64 {
    target.signed_duration_since(today).num_days()
}

/// `D-9`, `D-Day`, `D+3`
pub fn format_dday(value: i64) -> String {
    match value {
        0 => "D-Day".to_string(),
        v if v > 0 => format!("D-{}", v),
        v => format!("D+{}", -v),
    }
}

/// Hour of day shown on timeline row `row` (row 0 is 06:00)
pub fn row_hour(row: u32) -> u32 {
    (TIMELINE_START_MINUTE / 60 + row) % 24
}

/// Start minute of timeline row `row`
pub fn row_start_minute(row: u32) -> u32 {
    row * 60 + TIMELINE_START_MINUTE
}

/// 12-hour label without AM/PM; 0 and 12 both read "12"
pub fn format_hour_label(hour: u32) -> String {
    match hour % 12 {
        0 => "12".to_string(),
        h => h.to_string(),
    }
}

/// `1h 30m`, `2h`, `45m`
pub fn format_duration(minutes: u32) -> String {
    let (h, m) = (minutes / 60, minutes % 60);
    match (h, m) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Minutes since midnight as `HH:MM`, wrapping past midnight
pub fn format_clock(minutes: u32) -> String {
    format!("{:02}:{:02}", (minutes / 60) % 24, minutes % 60)
}

/// `2026년 1월 24일 (토)`
pub fn format_korean_date(date: NaiveDate) -> String {
    let weekday = KOREAN_WEEKDAYS[date.weekday().num_days_from_sunday() as usize];
    format!(
        "{}년 {}월 {}일 ({})",
        date.year(),
        date.month(),
        date.day(),
        weekday
    )
}

/// Block color, then its subject's color, then the default
pub fn resolve_block_color<'a>(block: &'a TimelineBlock, subjects: &'a [Subject]) -> &'a str {
    if let Some(color) = &block.color {
        return color;
    }
    block
        .subject_id
        .as_deref()
        .and_then(|id| subjects.iter().find(|s| s.id == id))
        .map(|s| s.color.as_str())
        .unwrap_or(DEFAULT_BLOCK_COLOR)
}

/// Text shown inside a block: its label, else the linked todo's content
pub fn block_label<'a>(block: &'a TimelineBlock, data: &'a DailyPlannerData) -> &'a str {
    if let Some(label) = &block.label {
        return label;
    }
    block
        .todo_id
        .as_deref()
        .and_then(|id| data.todo(id))
        .map(|t| t.content.as_str())
        .unwrap_or("")
}

/// Blocks of one column whose todo/subject references still resolve
pub fn renderable_blocks(
    data: &DailyPlannerData,
    kind: BlockKind,
) -> impl Iterator<Item = &TimelineBlock> {
    data.timeline_blocks.iter().filter(move |b| {
        b.kind == kind
            && b.todo_id.as_deref().is_none_or(|id| data.todo(id).is_some())
            && b.subject_id.as_deref().is_none_or(|id| data.subject(id).is_some())
    })
}

/// (completed, total) todos for a subject
pub fn subject_progress(data: &DailyPlannerData, subject_id: &str) -> (usize, usize) {
    data.todos_for(subject_id)
        .fold((0, 0), |(done, total), t| {
            (done + usize::from(t.is_completed), total + 1)
        })
}
