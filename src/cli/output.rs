use chrono::NaiveDate;
use serde::Serialize;

use crate::model::planner::{BlockKind, DailyPlannerData, Dday, TimelineBlock};
use crate::ops::derive;

/// Characters of an id shown in listings
const SHORT_ID_LEN: usize = 8;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct DdayJson {
    pub label: String,
    pub target_date: NaiveDate,
    pub days: i64,
    pub display: String,
}

#[derive(Serialize)]
pub struct SubjectStatsJson {
    pub id: String,
    pub name: String,
    pub completed: usize,
    pub total: usize,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub date: NaiveDate,
    pub study_minutes: u32,
    pub planned_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dday: Option<DdayJson>,
    pub subjects: Vec<SubjectStatsJson>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn dday_to_json(dday: &Dday, today: NaiveDate) -> DdayJson {
    let days = derive::dday_value(today, dday.target_date);
    DdayJson {
        label: dday.label.clone(),
        target_date: dday.target_date,
        days,
        display: derive::format_dday(days),
    }
}

pub fn stats_to_json(data: &DailyPlannerData) -> StatsJson {
    StatsJson {
        date: data.date(),
        study_minutes: derive::study_minutes(&data.timeline_blocks),
        planned_minutes: planned_minutes(data),
        dday: data
            .daily_info
            .dday
            .as_ref()
            .map(|d| dday_to_json(d, data.date())),
        subjects: data
            .subjects
            .iter()
            .map(|s| {
                let (completed, total) = derive::subject_progress(data, &s.id);
                SubjectStatsJson {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    completed,
                    total,
                }
            })
            .collect(),
    }
}

fn planned_minutes(data: &DailyPlannerData) -> u32 {
    data.timeline_blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Plan)
        .map(TimelineBlock::duration)
        .sum()
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

fn format_dday_line(dday: &Dday, today: NaiveDate) -> String {
    let value = derive::dday_value(today, dday.target_date);
    format!(
        "{} {} ({})",
        derive::format_dday(value),
        dday.label,
        dday.target_date
    )
}

fn format_block_line(block: &TimelineBlock, data: &DailyPlannerData) -> String {
    let (cell_start, cell_span) = block.lanes();
    format!(
        "  {}-{}  {}  ({}, cells {}+{})",
        derive::format_clock(block.start_time),
        derive::format_clock(block.end_time),
        derive::block_label(block, data),
        short_id(&block.id),
        cell_start,
        cell_span
    )
}

/// Full text view of a day
pub fn format_day(data: &DailyPlannerData) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("== {} ==", derive::format_korean_date(data.date())));

    if let Some(dday) = &data.daily_info.dday {
        lines.push(format_dday_line(dday, data.date()));
    }
    if !data.daily_info.daily_quote.is_empty() {
        lines.push(format!("\"{}\"", data.daily_info.daily_quote));
    }

    for subject in &data.subjects {
        let (done, total) = derive::subject_progress(data, &subject.id);
        lines.push(String::new());
        lines.push(format!(
            "[{}] {}  {}  {}/{}",
            subject.name,
            short_id(&subject.id),
            subject.color,
            done,
            total
        ));
        for todo in data.todos_for(&subject.id) {
            let mark = if todo.is_completed { 'x' } else { ' ' };
            lines.push(format!(
                "  [{}] {} {}",
                mark,
                short_id(&todo.id),
                todo.content
            ));
        }
    }

    for kind in [BlockKind::Plan, BlockKind::Done] {
        let mut blocks: Vec<&TimelineBlock> = derive::renderable_blocks(data, kind).collect();
        if blocks.is_empty() {
            continue;
        }
        blocks.sort_by_key(|b| (b.start_time, b.lanes().0));
        lines.push(String::new());
        lines.push(format!("-- {} --", kind.label()));
        for block in blocks {
            lines.push(format_block_line(block, data));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "study: {}",
        derive::format_duration(derive::study_minutes(&data.timeline_blocks))
    ));
    lines
}

pub fn format_stats(data: &DailyPlannerData) -> Vec<String> {
    let mut lines = vec![
        format!(
            "study:   {}",
            derive::format_duration(derive::study_minutes(&data.timeline_blocks))
        ),
        format!("planned: {}", derive::format_duration(planned_minutes(data))),
    ];
    if let Some(dday) = &data.daily_info.dday {
        lines.push(format!("d-day:   {}", format_dday_line(dday, data.date())));
    }
    for subject in &data.subjects {
        let (done, total) = derive::subject_progress(data, &subject.id);
        lines.push(format!("  {} {}/{}", subject.name, done, total));
    }
    lines
}

/// Parse a `plan`/`done` column name
pub fn parse_block_kind(s: &str) -> Result<BlockKind, String> {
    BlockKind::parse_kind(s).ok_or_else(|| format!("unknown kind '{}' (expected: plan, done)", s))
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", s))
}
