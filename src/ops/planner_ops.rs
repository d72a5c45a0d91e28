use crate::model::palette::next_subject_color;
use crate::model::planner::{
    BlockPatch, DailyInfoPatch, DailyPlannerData, NewTimelineBlock, Subject, SubjectPatch,
    TimelineBlock, Todo, TodoPatch,
};

/// Error type for planner entity operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    #[error("subject not found: {0}")]
    SubjectNotFound(String),
    #[error("todo not found: {0}")]
    TodoNotFound(String),
    #[error("timeline block not found: {0}")]
    BlockNotFound(String),
    #[error("ambiguous reference {0:?} matches more than one entry")]
    Ambiguous(String),
}

/// Generate a fresh opaque id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// Daily info
// ---------------------------------------------------------------------------

/// Shallow merge into the day's info
pub fn update_daily_info(data: &mut DailyPlannerData, patch: DailyInfoPatch) {
    if let Some(dday) = patch.dday {
        data.daily_info.dday = dday;
    }
    if let Some(quote) = patch.daily_quote {
        data.daily_info.daily_quote = quote;
    }
}

// ---------------------------------------------------------------------------
// Subjects
// ---------------------------------------------------------------------------

/// Append a subject with the first unused palette color.
pub fn add_subject(data: &mut DailyPlannerData, id: String, name: String) -> Subject {
    let color = next_subject_color(&data.subjects).to_string();
    let subject = Subject { id, name, color };
    data.subjects.push(subject.clone());
    subject
}

pub fn update_subject(
    data: &mut DailyPlannerData,
    id: &str,
    patch: SubjectPatch,
) -> Result<(), PlannerError> {
    let subject = data
        .subjects
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| PlannerError::SubjectNotFound(id.to_string()))?;
    if let Some(name) = patch.name {
        subject.name = name;
    }
    if let Some(color) = patch.color {
        subject.color = color;
    }
    Ok(())
}

/// Delete a subject, its todos, and every block linked to those todos.
/// Returns the ids of the removed todos.
pub fn delete_subject(data: &mut DailyPlannerData, id: &str) -> Result<Vec<String>, PlannerError> {
    let idx = data
        .subjects
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| PlannerError::SubjectNotFound(id.to_string()))?;
    data.subjects.remove(idx);

    let removed: Vec<String> = data
        .todos
        .iter()
        .filter(|t| t.subject_id == id)
        .map(|t| t.id.clone())
        .collect();
    data.todos.retain(|t| t.subject_id != id);
    data.timeline_blocks.retain(|b| match &b.todo_id {
        Some(todo_id) => !removed.contains(todo_id),
        None => true,
    });
    Ok(removed)
}

// ---------------------------------------------------------------------------
// Todos
// ---------------------------------------------------------------------------

/// Append a todo under an existing subject.
pub fn add_todo(
    data: &mut DailyPlannerData,
    id: String,
    subject_id: &str,
    content: String,
) -> Result<Todo, PlannerError> {
    if data.subject(subject_id).is_none() {
        return Err(PlannerError::SubjectNotFound(subject_id.to_string()));
    }
    let todo = Todo {
        id,
        subject_id: subject_id.to_string(),
        content,
        is_completed: false,
    };
    data.todos.push(todo.clone());
    Ok(todo)
}

pub fn update_todo(data: &mut DailyPlannerData, id: &str, patch: TodoPatch) -> Result<(), PlannerError> {
    let todo = find_todo_mut(data, id)?;
    if let Some(content) = patch.content {
        todo.content = content;
    }
    if let Some(done) = patch.is_completed {
        todo.is_completed = done;
    }
    Ok(())
}

/// Flip completion. Returns the new value.
pub fn toggle_todo_complete(data: &mut DailyPlannerData, id: &str) -> Result<bool, PlannerError> {
    let todo = find_todo_mut(data, id)?;
    todo.is_completed = !todo.is_completed;
    Ok(todo.is_completed)
}

/// Delete a todo and the blocks linked to it. Unlinked blocks stay.
pub fn delete_todo(data: &mut DailyPlannerData, id: &str) -> Result<(), PlannerError> {
    let idx = data
        .todos
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| PlannerError::TodoNotFound(id.to_string()))?;
    data.todos.remove(idx);
    data.timeline_blocks
        .retain(|b| b.todo_id.as_deref() != Some(id));
    Ok(())
}

fn find_todo_mut<'a>(data: &'a mut DailyPlannerData, id: &str) -> Result<&'a mut Todo, PlannerError> {
    data.todos
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| PlannerError::TodoNotFound(id.to_string()))
}

// ---------------------------------------------------------------------------
// Timeline blocks
// ---------------------------------------------------------------------------

pub fn add_timeline_block(
    data: &mut DailyPlannerData,
    id: String,
    new: NewTimelineBlock,
) -> TimelineBlock {
    let block = TimelineBlock::from_new(id, new);
    data.timeline_blocks.push(block.clone());
    block
}

pub fn update_timeline_block(
    data: &mut DailyPlannerData,
    id: &str,
    patch: BlockPatch,
) -> Result<(), PlannerError> {
    let block = data
        .timeline_blocks
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or_else(|| PlannerError::BlockNotFound(id.to_string()))?;
    if let Some(start) = patch.start_time {
        block.start_time = start;
    }
    if let Some(end) = patch.end_time {
        block.end_time = end;
    }
    if let Some(kind) = patch.kind {
        block.kind = kind;
    }
    if let Some(label) = patch.label {
        block.label = label;
    }
    if let Some(color) = patch.color {
        block.color = color;
    }
    if let Some(cell_start) = patch.cell_start {
        block.cell_start = Some(cell_start);
    }
    if let Some(cell_span) = patch.cell_span {
        block.cell_span = Some(cell_span);
    }
    Ok(())
}

pub fn delete_timeline_block(data: &mut DailyPlannerData, id: &str) -> Result<(), PlannerError> {
    let before = data.timeline_blocks.len();
    data.timeline_blocks.retain(|b| b.id != id);
    if data.timeline_blocks.len() == before {
        return Err(PlannerError::BlockNotFound(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Lookup by id prefix (CLI references)
// ---------------------------------------------------------------------------

/// Shortest prefix accepted when resolving an id
pub const MIN_PREFIX_LEN: usize = 4;

fn resolve_by_prefix<'a, I>(ids: I, key: &str) -> Option<Result<&'a str, PlannerError>>
where
    I: Iterator<Item = &'a str>,
{
    let ids: Vec<&str> = ids.collect();
    if let Some(exact) = ids.iter().find(|id| **id == key) {
        return Some(Ok(*exact));
    }
    if key.len() < MIN_PREFIX_LEN {
        return None;
    }
    let mut matches = ids.into_iter().filter(|id| id.starts_with(key));
    let first = matches.next()?;
    if matches.next().is_some() {
        return Some(Err(PlannerError::Ambiguous(key.to_string())));
    }
    Some(Ok(first))
}

/// Resolve a subject by id, unique id prefix, or exact name.
pub fn resolve_subject<'a>(data: &'a DailyPlannerData, key: &str) -> Result<&'a Subject, PlannerError> {
    if let Some(found) = resolve_by_prefix(data.subjects.iter().map(|s| s.id.as_str()), key) {
        let id = found?;
        return data
            .subject(id)
            .ok_or_else(|| PlannerError::SubjectNotFound(key.to_string()));
    }
    let mut named = data.subjects.iter().filter(|s| s.name == key);
    match (named.next(), named.next()) {
        (Some(s), None) => Ok(s),
        (Some(_), Some(_)) => Err(PlannerError::Ambiguous(key.to_string())),
        _ => Err(PlannerError::SubjectNotFound(key.to_string())),
    }
}

pub fn resolve_todo<'a>(data: &'a DailyPlannerData, key: &str) -> Result<&'a Todo, PlannerError> {
    let id = resolve_by_prefix(data.todos.iter().map(|t| t.id.as_str()), key)
        .ok_or_else(|| PlannerError::TodoNotFound(key.to_string()))??;
    data.todo(id)
        .ok_or_else(|| PlannerError::TodoNotFound(key.to_string()))
}

pub fn resolve_block<'a>(
    data: &'a DailyPlannerData,
    key: &str,
) -> Result<&'a TimelineBlock, PlannerError> {
    let id = resolve_by_prefix(data.timeline_blocks.iter().map(|b| b.id.as_str()), key)
        .ok_or_else(|| PlannerError::BlockNotFound(key.to_string()))??;
    data.block(id)
        .ok_or_else(|| PlannerError::BlockNotFound(key.to_string()))
}
