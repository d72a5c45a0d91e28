//! Task list gestures: tap, swipe-to-reveal-delete, drag-to-timeline.
//!
//! One gesture is tracked at a time. A pointer-down arms a pending gesture;
//! the first movement past the tap threshold locks its classification
//! (swipe or drag) for the rest of the gesture. Releasing without any
//! classification is a tap.

use crate::model::palette::DEFAULT_BLOCK_COLOR;
use crate::model::planner::DailyPlannerData;
use crate::util::edit_buffer::EditBuffer;

use super::drag_session::{DragCoordinator, DragPayload};
use super::{GestureConfig, Point, exceeds_threshold};

/// A row in the task list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Subject(String),
    Todo(String),
}

/// Which part of a row the pointer landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitArea {
    Checkbox,
    Label,
    Body,
    /// The delete button behind a revealed row
    DeleteButton,
    /// An open text field; it keeps the pointer to itself
    Input,
}

/// Result of hit testing, innermost row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHit {
    pub row: RowKey,
    pub area: HitArea,
}

impl RowHit {
    pub fn new(row: RowKey, area: HitArea) -> Self {
        RowHit { row, area }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Idle,
    EditingContent,
    SwipeTracking,
    SwipeRevealed,
    DragPendingDecision,
    DraggingToTimeline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListAction {
    None,
    ToggleComplete(String),
    /// Open the inline editor; the caller supplies the current text to `begin_edit`
    StartEdit(RowKey),
    ToggleExpand(String),
    Delete(RowKey),
    CloseReveal,
    DragReleased,
}

#[derive(Debug, Clone)]
enum Gesture {
    Pending {
        hit: RowHit,
        start: Point,
        reveal_was_open: bool,
    },
    Swiping {
        row: RowKey,
        start: Point,
        offset: f32,
    },
    Dragging {
        row: RowKey,
    },
    /// Classified as something this list does not handle (vertical on a subject)
    Ignored {
        row: RowKey,
    },
}

impl Gesture {
    fn row(&self) -> &RowKey {
        match self {
            Gesture::Pending { hit, .. } => &hit.row,
            Gesture::Swiping { row, .. } | Gesture::Dragging { row } | Gesture::Ignored { row } => {
                row
            }
        }
    }
}

#[derive(Debug)]
pub struct TaskListController {
    config: GestureConfig,
    active: Option<Gesture>,
    revealed: Option<RowKey>,
    editing: Option<(RowKey, EditBuffer)>,
}

impl TaskListController {
    pub fn new(config: GestureConfig) -> Self {
        TaskListController {
            config,
            active: None,
            revealed: None,
            editing: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn row_state(&self, row: &RowKey) -> RowState {
        if let Some(gesture) = &self.active
            && gesture.row() == row
        {
            match gesture {
                Gesture::Pending { hit, .. } => {
                    return match hit.row {
                        RowKey::Todo(_) => RowState::DragPendingDecision,
                        RowKey::Subject(_) => RowState::SwipeTracking,
                    };
                }
                Gesture::Swiping { .. } => return RowState::SwipeTracking,
                Gesture::Dragging { .. } => return RowState::DraggingToTimeline,
                Gesture::Ignored { .. } => {}
            }
        }
        if self.revealed.as_ref() == Some(row) {
            return RowState::SwipeRevealed;
        }
        if self.editing.as_ref().is_some_and(|(r, _)| r == row) {
            return RowState::EditingContent;
        }
        RowState::Idle
    }

    /// Horizontal offset to draw the row with (pixels, leftward)
    pub fn row_offset(&self, row: &RowKey) -> f32 {
        match &self.active {
            Some(Gesture::Swiping { row: r, offset, .. }) if r == row => *offset,
            _ if self.revealed.as_ref() == Some(row) => self.config.swipe_threshold,
            _ => 0.0,
        }
    }

    pub fn revealed(&self) -> Option<&RowKey> {
        self.revealed.as_ref()
    }

    pub fn is_tracking(&self) -> bool {
        self.active.is_some()
    }

    pub fn editing(&self) -> Option<(&RowKey, &EditBuffer)> {
        self.editing.as_ref().map(|(row, buf)| (row, buf))
    }

    // -----------------------------------------------------------------------
    // Pointer events
    // -----------------------------------------------------------------------

    pub fn pointer_down(&mut self, hit: RowHit, at: Point, drag: &mut DragCoordinator) {
        if hit.area == HitArea::Input {
            return;
        }
        if self.active.is_some() {
            // A release went missing; never leave a stale drag behind
            tracing::debug!("pointer down with a gesture in flight, resetting");
            self.pointer_cancel(drag);
        }
        self.active = Some(Gesture::Pending {
            hit,
            start: at,
            reveal_was_open: self.revealed.is_some(),
        });
    }

    pub fn pointer_move(&mut self, at: Point, data: &DailyPlannerData, drag: &mut DragCoordinator) {
        let Some(gesture) = self.active.take() else {
            return;
        };
        self.active = Some(match gesture {
            Gesture::Pending {
                hit,
                start,
                reveal_was_open,
            } => {
                let (dx, dy) = at.delta_from(start);
                if !exceeds_threshold(dx, dy, self.config.tap_threshold) {
                    Gesture::Pending {
                        hit,
                        start,
                        reveal_was_open,
                    }
                } else if dx.abs() > self.config.direction_ratio * dy.abs() {
                    // At most one row is revealed; a new swipe closes it first
                    self.revealed = None;
                    Gesture::Swiping {
                        row: hit.row,
                        start,
                        offset: self.swipe_offset(dx),
                    }
                } else {
                    self.begin_drag(hit.row, at, data, drag)
                }
            }
            Gesture::Swiping { row, start, .. } => {
                let (dx, _) = at.delta_from(start);
                Gesture::Swiping {
                    row,
                    start,
                    offset: self.swipe_offset(dx),
                }
            }
            Gesture::Dragging { row } => match drag.move_to(at) {
                Ok(()) => Gesture::Dragging { row },
                Err(e) => {
                    tracing::warn!(error = %e, "drag session lost mid-gesture");
                    Gesture::Ignored { row }
                }
            },
            ignored @ Gesture::Ignored { .. } => ignored,
        });
    }

    pub fn pointer_up(&mut self, at: Point, drag: &mut DragCoordinator) -> TaskListAction {
        let Some(gesture) = self.active.take() else {
            return TaskListAction::None;
        };
        match gesture {
            Gesture::Pending {
                hit,
                reveal_was_open,
                ..
            } => self.tap(hit, reveal_was_open),
            Gesture::Swiping { row, offset, .. } => {
                if offset > self.config.swipe_threshold {
                    self.revealed = Some(row);
                }
                TaskListAction::None
            }
            Gesture::Dragging { .. } => {
                if let Err(e) = drag.drop_at(at) {
                    tracing::warn!(error = %e, "drop without a drag session");
                }
                TaskListAction::DragReleased
            }
            Gesture::Ignored { .. } => TaskListAction::None,
        }
    }

    /// Abort the current gesture (pointer left the window, focus lost).
    pub fn pointer_cancel(&mut self, drag: &mut DragCoordinator) {
        if let Some(Gesture::Dragging { .. }) = self.active.take() {
            drag.cancel();
        }
    }

    /// Forget everything, e.g. after the active date changed.
    pub fn reset(&mut self, drag: &mut DragCoordinator) {
        self.pointer_cancel(drag);
        self.revealed = None;
        self.editing = None;
    }

    /// Close the revealed row without a gesture (keyboard escape)
    pub fn close_reveal(&mut self) {
        self.revealed = None;
    }

    fn swipe_offset(&self, dx: f32) -> f32 {
        (-dx).clamp(0.0, self.config.swipe_threshold + self.config.swipe_overshoot)
    }

    fn begin_drag(
        &mut self,
        row: RowKey,
        at: Point,
        data: &DailyPlannerData,
        drag: &mut DragCoordinator,
    ) -> Gesture {
        let RowKey::Todo(todo_id) = &row else {
            return Gesture::Ignored { row };
        };
        let Some(todo) = data.todo(todo_id) else {
            tracing::debug!(todo = %todo_id, "drag on a todo that no longer exists");
            return Gesture::Ignored { row };
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
        self.revealed = None;
        match drag.start(payload, at) {
            Ok(()) => Gesture::Dragging { row },
            Err(e) => {
                tracing::warn!(error = %e, "could not start drag");
                Gesture::Ignored { row }
            }
        }
    }

    fn tap(&mut self, hit: RowHit, reveal_was_open: bool) -> TaskListAction {
        if reveal_was_open {
            let revealed = self.revealed.take();
            if hit.area == HitArea::DeleteButton && revealed.as_ref() == Some(&hit.row) {
                return TaskListAction::Delete(hit.row);
            }
            return TaskListAction::CloseReveal;
        }
        match (hit.row, hit.area) {
            (RowKey::Todo(id), HitArea::Checkbox) => TaskListAction::ToggleComplete(id),
            (row @ RowKey::Todo(_), HitArea::Label) => TaskListAction::StartEdit(row),
            (RowKey::Subject(id), HitArea::Checkbox | HitArea::Label | HitArea::Body) => {
                TaskListAction::ToggleExpand(id)
            }
            _ => TaskListAction::None,
        }
    }

    // -----------------------------------------------------------------------
    // Inline editing
    // -----------------------------------------------------------------------

    pub fn begin_edit(&mut self, row: RowKey, content: &str) {
        self.revealed = None;
        self.editing = Some((row, EditBuffer::new(content)));
    }

    pub fn edit_buffer_mut(&mut self) -> Option<&mut EditBuffer> {
        self.editing.as_mut().map(|(_, buf)| buf)
    }

    /// Close the editor. Returns the row and trimmed text, or `None` when
    /// nothing was being edited or the text is blank.
    pub fn commit_edit(&mut self) -> Option<(RowKey, String)> {
        let (row, buf) = self.editing.take()?;
        let text = buf.text().trim();
        if text.is_empty() {
            return None;
        }
        Some((row, text.to_string()))
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }
}
