//! Timeline gestures: drop-to-create, select, move, resize and trash.
//!
//! The grid has [`TOTAL_HOURS`] rows starting at 06:00 and
//! [`CELLS_PER_ROW`] lanes per row in each of the two columns. Moves snap
//! to whole hours and whole lanes; resizes only ever touch the lanes.

use crate::model::planner::{
    BlockId, BlockKind, BlockPatch, CELLS_PER_ROW, DROP_CELL_SPAN, DROP_CELL_START,
    DailyPlannerData, NewTimelineBlock, TIMELINE_END_MINUTE, TIMELINE_START_MINUTE, TOTAL_HOURS,
};

use super::drag_session::{DragEvent, DragPayload};
use super::{GestureConfig, Point, Rect, exceeds_threshold};

/// Screen geometry of the timeline, in pointer pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimelineLayout {
    pub plan: Rect,
    pub done: Rect,
    pub trash: Option<Rect>,
    pub row_height: f32,
}

impl TimelineLayout {
    pub fn column(&self, kind: BlockKind) -> Rect {
        match kind {
            BlockKind::Plan => self.plan,
            BlockKind::Done => self.done,
        }
    }

    pub fn column_at(&self, p: Point) -> Option<BlockKind> {
        [BlockKind::Plan, BlockKind::Done]
            .into_iter()
            .find(|&kind| self.column(kind).contains(p))
    }

    pub fn cell_width(&self, kind: BlockKind) -> f32 {
        self.column(kind).width / f32::from(CELLS_PER_ROW)
    }

    /// Nearest hour row for a y coordinate, clamped to the grid
    pub fn row_at(&self, kind: BlockKind, y: f32) -> u32 {
        if self.row_height <= 0.0 {
            return 0;
        }
        let local = (y - self.column(kind).y) / self.row_height;
        (local.round().max(0.0) as u32).min(TOTAL_HOURS - 1)
    }

    pub fn over_trash(&self, p: Point) -> bool {
        self.trash.is_some_and(|r| r.contains(p))
    }

    /// Where a block with the given placement is drawn
    pub fn block_rect(
        &self,
        kind: BlockKind,
        start_time: u32,
        end_time: u32,
        cell_start: u8,
        cell_span: u8,
    ) -> Rect {
        let col = self.column(kind);
        let cw = self.cell_width(kind);
        let top = start_time.saturating_sub(TIMELINE_START_MINUTE) as f32 / 60.0;
        let rows = end_time.saturating_sub(start_time) as f32 / 60.0;
        Rect::new(
            col.x + f32::from(cell_start) * cw,
            col.y + top * self.row_height,
            f32::from(cell_span) * cw,
            rows * self.row_height,
        )
    }
}

/// The block that a drop on `row` of `kind` creates
pub fn dropped_block(payload: &DragPayload, kind: BlockKind, row: u32) -> NewTimelineBlock {
    let start_time = row.min(TOTAL_HOURS - 1) * 60 + TIMELINE_START_MINUTE;
    NewTimelineBlock {
        todo_id: Some(payload.todo_id.clone()),
        subject_id: Some(payload.subject_id.clone()),
        start_time,
        end_time: start_time + 60,
        kind,
        label: Some(payload.content.clone()),
        color: Some(payload.color.clone()),
        cell_start: Some(DROP_CELL_START),
        cell_span: Some(DROP_CELL_SPAN),
    }
}

/// Which part of a block the pointer landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockHit {
    Body,
    LeftHandle,
    RightHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    Idle,
    Selected,
    Dragging,
    ResizingLeft,
    ResizingRight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineAction {
    Create(NewTimelineBlock),
    Update { id: BlockId, patch: BlockPatch },
    Delete(BlockId),
}

/// Live placement of a block being moved or resized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ghost {
    pub id: BlockId,
    pub kind: BlockKind,
    pub start_time: u32,
    pub end_time: u32,
    pub cell_start: u8,
    pub cell_span: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Left,
    Right,
}

#[derive(Debug, Clone)]
enum Interaction {
    Move {
        origin: Point,
        original: Ghost,
        ghost: Ghost,
        was_selected: bool,
        moved: bool,
    },
    Resize {
        edge: Edge,
        origin: Point,
        original: Ghost,
        ghost: Ghost,
    },
}

impl Interaction {
    fn id(&self) -> &str {
        match self {
            Interaction::Move { original, .. } | Interaction::Resize { original, .. } => {
                &original.id
            }
        }
    }
}

#[derive(Debug)]
pub struct TimelineController {
    config: GestureConfig,
    layout: TimelineLayout,
    selected: Option<BlockId>,
    interaction: Option<Interaction>,
    incoming: Option<DragPayload>,
    preview: Option<NewTimelineBlock>,
    trash_hot: bool,
}

impl TimelineController {
    pub fn new(config: GestureConfig, layout: TimelineLayout) -> Self {
        TimelineController {
            config,
            layout,
            selected: None,
            interaction: None,
            incoming: None,
            preview: None,
            trash_hot: false,
        }
    }

    pub fn layout(&self) -> &TimelineLayout {
        &self.layout
    }

    /// Geometry changed (terminal resize). Any in-flight interaction is
    /// measured against the old layout, so it is dropped.
    pub fn set_layout(&mut self, layout: TimelineLayout) {
        if layout != self.layout {
            self.layout = layout;
            self.interaction = None;
            self.trash_hot = false;
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn block_state(&self, id: &str) -> BlockState {
        match &self.interaction {
            Some(Interaction::Move { moved: true, .. }) if self.interaction_is(id) => {
                return BlockState::Dragging;
            }
            Some(Interaction::Resize { edge, .. }) if self.interaction_is(id) => {
                return match edge {
                    Edge::Left => BlockState::ResizingLeft,
                    Edge::Right => BlockState::ResizingRight,
                };
            }
            _ => {}
        }
        if self.selected.as_deref() == Some(id) {
            BlockState::Selected
        } else {
            BlockState::Idle
        }
    }

    /// Where the block under the pointer would land if released now
    pub fn ghost(&self) -> Option<&Ghost> {
        match &self.interaction {
            Some(Interaction::Move {
                ghost, moved: true, ..
            })
            | Some(Interaction::Resize { ghost, .. }) => Some(ghost),
            _ => None,
        }
    }

    /// The block a pending drop would create
    pub fn preview(&self) -> Option<&NewTimelineBlock> {
        self.preview.as_ref()
    }

    pub fn trash_hot(&self) -> bool {
        self.trash_hot
    }

    /// A block is being dragged (past the tap threshold)
    pub fn is_moving(&self) -> bool {
        matches!(self.interaction, Some(Interaction::Move { moved: true, .. }))
    }

    fn interaction_is(&self, id: &str) -> bool {
        self.interaction.as_ref().is_some_and(|i| i.id() == id)
    }

    // -----------------------------------------------------------------------
    // Drops from the task list
    // -----------------------------------------------------------------------

    pub fn handle_drag_event(&mut self, event: DragEvent) -> Option<TimelineAction> {
        match event {
            DragEvent::Started { payload, at } => {
                self.incoming = Some(payload);
                self.track_incoming(at);
                None
            }
            DragEvent::Moved { at } => {
                self.track_incoming(at);
                None
            }
            DragEvent::Dropped { payload, at } => {
                self.incoming = None;
                self.preview = None;
                self.drop_at(&payload, at)
            }
            DragEvent::Cancelled => {
                self.incoming = None;
                self.drag_leave();
                None
            }
        }
    }

    fn track_incoming(&mut self, at: Point) {
        match self.incoming.take() {
            Some(payload) => {
                self.drag_over(&payload, at);
                self.incoming = Some(payload);
            }
            None => self.drag_leave(),
        }
    }

    /// Update the drop preview for a payload hovering at `at`
    pub fn drag_over(&mut self, payload: &DragPayload, at: Point) {
        self.preview = self
            .layout
            .column_at(at)
            .map(|kind| dropped_block(payload, kind, self.layout.row_at(kind, at.y)));
    }

    pub fn drag_leave(&mut self) {
        self.preview = None;
    }

    /// A payload released at `at`. Outside both columns nothing happens.
    pub fn drop_at(&mut self, payload: &DragPayload, at: Point) -> Option<TimelineAction> {
        self.preview = None;
        let kind = self.layout.column_at(at)?;
        let row = self.layout.row_at(kind, at.y);
        tracing::debug!(todo = %payload.todo_id, column = kind.label(), row, "drop on timeline");
        Some(TimelineAction::Create(dropped_block(payload, kind, row)))
    }

    // -----------------------------------------------------------------------
    // Block pointer events
    // -----------------------------------------------------------------------

    pub fn pointer_down_block(
        &mut self,
        id: &str,
        hit: BlockHit,
        at: Point,
        data: &DailyPlannerData,
    ) {
        let Some(block) = data.block(id) else {
            tracing::debug!(block = %id, "pointer down on unknown block");
            return;
        };
        let (cell_start, cell_span) = block.lanes();
        let original = Ghost {
            id: block.id.clone(),
            kind: block.kind,
            start_time: block.start_time,
            end_time: block.end_time,
            cell_start,
            cell_span,
        };
        let was_selected = self.selected.as_deref() == Some(id);
        self.trash_hot = false;
        self.interaction = Some(match hit {
            BlockHit::LeftHandle | BlockHit::RightHandle if was_selected => Interaction::Resize {
                edge: if hit == BlockHit::LeftHandle {
                    Edge::Left
                } else {
                    Edge::Right
                },
                origin: at,
                ghost: original.clone(),
                original,
            },
            _ => {
                self.selected = Some(block.id.clone());
                Interaction::Move {
                    origin: at,
                    ghost: original.clone(),
                    original,
                    was_selected,
                    moved: false,
                }
            }
        });
    }

    pub fn pointer_down_empty(&mut self) {
        self.pointer_cancel();
        self.clear_selection();
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn pointer_move(&mut self, at: Point) {
        let layout = self.layout;
        let threshold = self.config.tap_threshold;
        match &mut self.interaction {
            Some(Interaction::Move {
                origin,
                original,
                ghost,
                moved,
                ..
            }) => {
                let (dx, dy) = at.delta_from(*origin);
                if !*moved && !exceeds_threshold(dx, dy, threshold) {
                    return;
                }
                *moved = true;
                let hours = snap(dy, layout.row_height);
                let cells = snap(dx, layout.cell_width(original.kind));
                let duration = original.end_time.saturating_sub(original.start_time);
                let latest = i64::from(TIMELINE_END_MINUTE.saturating_sub(duration))
                    .max(i64::from(TIMELINE_START_MINUTE));
                let start = (i64::from(original.start_time) + hours * 60)
                    .clamp(i64::from(TIMELINE_START_MINUTE), latest);
                ghost.start_time = start as u32;
                ghost.end_time = ghost.start_time + duration;
                let max_start = i64::from(CELLS_PER_ROW - original.cell_span);
                ghost.cell_start =
                    (i64::from(original.cell_start) + cells).clamp(0, max_start) as u8;
                self.trash_hot = layout.over_trash(at);
            }
            Some(Interaction::Resize {
                edge,
                origin,
                original,
                ghost,
            }) => {
                let (dx, _) = at.delta_from(*origin);
                let cells = snap(dx, layout.cell_width(original.kind));
                match edge {
                    Edge::Left => {
                        let right = i64::from(original.cell_start + original.cell_span);
                        let start = (i64::from(original.cell_start) + cells).clamp(0, right - 1);
                        ghost.cell_start = start as u8;
                        ghost.cell_span = (right - start) as u8;
                    }
                    Edge::Right => {
                        let max_span = i64::from(CELLS_PER_ROW - original.cell_start);
                        ghost.cell_span =
                            (i64::from(original.cell_span) + cells).clamp(1, max_span) as u8;
                    }
                }
            }
            None => {}
        }
    }

    pub fn pointer_up(&mut self, at: Point) -> Option<TimelineAction> {
        self.pointer_move(at);
        let trash_hot = std::mem::take(&mut self.trash_hot);
        match self.interaction.take()? {
            Interaction::Move {
                was_selected,
                moved: false,
                ..
            } => {
                if was_selected {
                    self.selected = None;
                }
                None
            }
            Interaction::Move {
                original, ghost, ..
            } => {
                if trash_hot {
                    self.selected = None;
                    return Some(TimelineAction::Delete(original.id));
                }
                if ghost == original {
                    return None;
                }
                Some(TimelineAction::Update {
                    id: original.id,
                    patch: BlockPatch {
                        start_time: Some(ghost.start_time),
                        end_time: Some(ghost.end_time),
                        cell_start: Some(ghost.cell_start),
                        cell_span: Some(ghost.cell_span),
                        ..Default::default()
                    },
                })
            }
            Interaction::Resize {
                original, ghost, ..
            } => {
                if ghost == original {
                    return None;
                }
                Some(TimelineAction::Update {
                    id: original.id,
                    patch: BlockPatch {
                        cell_start: Some(ghost.cell_start),
                        cell_span: Some(ghost.cell_span),
                        ..Default::default()
                    },
                })
            }
        }
    }

    pub fn pointer_cancel(&mut self) {
        self.interaction = None;
        self.trash_hot = false;
    }

    pub fn delete_selected(&mut self) -> Option<TimelineAction> {
        self.pointer_cancel();
        self.selected.take().map(TimelineAction::Delete)
    }

    /// Drop the selection if its block no longer exists
    pub fn forget_missing(&mut self, data: &DailyPlannerData) {
        if let Some(id) = &self.selected
            && data.block(id).is_none()
        {
            self.selected = None;
        }
        if let Some(interaction) = &self.interaction
            && data.block(interaction.id()).is_none()
        {
            self.pointer_cancel();
        }
    }

    pub fn reset(&mut self) {
        self.pointer_cancel();
        self.selected = None;
        self.incoming = None;
        self.preview = None;
    }
}

/// Whole steps of `size` in `delta`, rounded to nearest
fn snap(delta: f32, size: f32) -> i64 {
    if size <= 0.0 {
        return 0;
    }
    (delta / size).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::planner::TimelineBlock;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const ROW: f32 = 16.0;

    /// Plan column at x 0..60, done at 100..160, 10px cells, trash below
    fn layout() -> TimelineLayout {
        TimelineLayout {
            plan: Rect::new(0.0, 0.0, 60.0, ROW * 24.0),
            done: Rect::new(100.0, 0.0, 60.0, ROW * 24.0),
            trash: Some(Rect::new(0.0, 400.0, 160.0, 16.0)),
            row_height: ROW,
        }
    }

    fn controller() -> TimelineController {
        TimelineController::new(GestureConfig::default(), layout())
    }

    fn payload() -> DragPayload {
        DragPayload {
            todo_id: "t".into(),
            subject_id: "s".into(),
            color: "#86EFAC".into(),
            content: "Chapter 1".into(),
        }
    }

    fn block(id: &str, start: u32, end: u32, cells: (u8, u8)) -> TimelineBlock {
        TimelineBlock {
            id: id.into(),
            todo_id: Some("t".into()),
            subject_id: Some("s".into()),
            start_time: start,
            end_time: end,
            kind: BlockKind::Plan,
            label: None,
            color: None,
            cell_start: Some(cells.0),
            cell_span: Some(cells.1),
        }
    }

    fn data_with(blocks: Vec<TimelineBlock>) -> DailyPlannerData {
        let mut data = DailyPlannerData::empty(NaiveDate::from_ymd_opt(2026, 1, 24).unwrap());
        data.timeline_blocks = blocks;
        data
    }

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn drop_on_done_row_three() {
        let mut c = controller();
        let action = c.drop_at(&payload(), p(153.0, 3.0 * ROW + 5.0));
        assert_eq!(
            action,
            Some(TimelineAction::Create(NewTimelineBlock {
                todo_id: Some("t".into()),
                subject_id: Some("s".into()),
                start_time: 540,
                end_time: 600,
                kind: BlockKind::Done,
                label: Some("Chapter 1".into()),
                color: Some("#86EFAC".into()),
                cell_start: Some(1),
                cell_span: Some(4),
            }))
        );
    }

    #[test]
    fn drop_row_rounds_and_clamps() {
        let mut c = controller();
        let start = |a: Option<TimelineAction>| match a {
            Some(TimelineAction::Create(b)) => b.start_time,
            other => panic!("unexpected {other:?}"),
        };
        // 2.6 rows rounds up to row 3
        assert_eq!(start(c.drop_at(&payload(), p(10.0, 2.6 * ROW))), 540);
        // Last row stays inside the grid
        assert_eq!(start(c.drop_at(&payload(), p(10.0, 23.9 * ROW))), 1740);
        assert_eq!(start(c.drop_at(&payload(), p(10.0, 0.0))), 360);
    }

    #[test]
    fn drop_outside_columns_creates_nothing() {
        let mut c = controller();
        // The gutter between the columns
        assert_eq!(c.drop_at(&payload(), p(80.0, 50.0)), None);
        assert_eq!(c.drop_at(&payload(), p(10.0, 500.0)), None);
    }

    #[test]
    fn drag_events_drive_preview_and_create() {
        let mut c = controller();
        c.handle_drag_event(DragEvent::Started {
            payload: payload(),
            at: p(300.0, 10.0),
        });
        assert!(c.preview().is_none());

        c.handle_drag_event(DragEvent::Moved {
            at: p(20.0, 2.0 * ROW),
        });
        let preview = c.preview().unwrap();
        assert_eq!(preview.kind, BlockKind::Plan);
        assert_eq!(preview.start_time, 480);

        c.handle_drag_event(DragEvent::Moved { at: p(80.0, 30.0) });
        assert!(c.preview().is_none());

        c.handle_drag_event(DragEvent::Moved {
            at: p(120.0, 5.0 * ROW),
        });
        assert_eq!(c.preview().unwrap().kind, BlockKind::Done);

        let action = c.handle_drag_event(DragEvent::Dropped {
            payload: payload(),
            at: p(120.0, 5.0 * ROW),
        });
        assert!(c.preview().is_none());
        match action {
            Some(TimelineAction::Create(b)) => {
                assert_eq!((b.start_time, b.end_time), (660, 720));
                assert_eq!(b.kind, BlockKind::Done);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cancelled_drag_clears_preview() {
        let mut c = controller();
        c.handle_drag_event(DragEvent::Started {
            payload: payload(),
            at: p(20.0, 20.0),
        });
        assert!(c.preview().is_some());
        assert_eq!(c.handle_drag_event(DragEvent::Cancelled), None);
        assert!(c.preview().is_none());
        // A stray move after cancel has no payload to preview
        c.handle_drag_event(DragEvent::Moved { at: p(20.0, 20.0) });
        assert!(c.preview().is_none());
    }

    #[test]
    fn tap_selects_then_deselects() {
        let mut c = controller();
        let data = data_with(vec![block("b", 480, 540, (1, 4))]);
        c.pointer_down_block("b", BlockHit::Body, p(20.0, 2.0 * ROW + 4.0), &data);
        assert_eq!(c.block_state("b"), BlockState::Selected);
        assert_eq!(c.pointer_up(p(22.0, 2.0 * ROW + 6.0)), None);
        assert_eq!(c.selected(), Some("b"));

        c.pointer_down_block("b", BlockHit::Body, p(20.0, 2.0 * ROW + 4.0), &data);
        assert_eq!(c.pointer_up(p(20.0, 2.0 * ROW + 4.0)), None);
        assert_eq!(c.selected(), None);
        assert_eq!(c.block_state("b"), BlockState::Idle);
    }

    #[test]
    fn move_snaps_to_hours_and_cells() {
        let mut c = controller();
        let data = data_with(vec![block("b", 480, 540, (1, 4))]);
        c.pointer_down_block("b", BlockHit::Body, p(20.0, 40.0), &data);
        // 2.2 rows down, 0.6 cells right
        c.pointer_move(p(26.0, 40.0 + 2.2 * ROW));
        assert_eq!(c.block_state("b"), BlockState::Dragging);
        let ghost = c.ghost().unwrap();
        assert_eq!((ghost.start_time, ghost.end_time), (600, 660));
        assert_eq!((ghost.cell_start, ghost.cell_span), (2, 4));

        let action = c.pointer_up(p(26.0, 40.0 + 2.2 * ROW));
        assert_eq!(
            action,
            Some(TimelineAction::Update {
                id: "b".into(),
                patch: BlockPatch {
                    start_time: Some(600),
                    end_time: Some(660),
                    cell_start: Some(2),
                    cell_span: Some(4),
                    ..Default::default()
                },
            })
        );
        assert!(c.ghost().is_none());
        assert_eq!(c.block_state("b"), BlockState::Selected);
    }

    #[test]
    fn move_is_clamped_inside_the_grid() {
        let mut c = controller();
        let data = data_with(vec![block("b", 1680, 1800, (3, 2))]);
        c.pointer_down_block("b", BlockHit::Body, p(35.0, 360.0), &data);
        c.pointer_move(p(200.0, 360.0 + 10.0 * ROW));
        let ghost = c.ghost().unwrap();
        assert_eq!((ghost.start_time, ghost.end_time), (1680, 1800));
        assert_eq!(ghost.cell_start, 4);

        c.pointer_move(p(-200.0, -400.0));
        let ghost = c.ghost().unwrap();
        assert_eq!((ghost.start_time, ghost.end_time), (360, 480));
        assert_eq!(ghost.cell_start, 0);
    }

    #[test]
    fn move_back_to_origin_commits_nothing() {
        let mut c = controller();
        let data = data_with(vec![block("b", 480, 540, (1, 4))]);
        c.pointer_down_block("b", BlockHit::Body, p(20.0, 40.0), &data);
        c.pointer_move(p(20.0, 80.0));
        assert_eq!(c.pointer_up(p(20.0, 41.0)), None);
        // A drag is not a tap, so selection stays
        assert_eq!(c.selected(), Some("b"));
    }

    #[test]
    fn release_over_trash_deletes() {
        let mut c = controller();
        let data = data_with(vec![block("b", 480, 540, (1, 4))]);
        c.pointer_down_block("b", BlockHit::Body, p(20.0, 40.0), &data);
        c.pointer_move(p(50.0, 405.0));
        assert!(c.is_moving());
        assert!(c.trash_hot());
        c.pointer_move(p(50.0, 300.0));
        assert!(!c.trash_hot());
        assert_eq!(
            c.pointer_up(p(50.0, 405.0)),
            Some(TimelineAction::Delete("b".into()))
        );
        assert_eq!(c.selected(), None);
        assert!(!c.trash_hot());
    }

    #[test]
    fn handles_resize_only_when_selected() {
        let mut c = controller();
        let data = data_with(vec![block("b", 480, 540, (1, 4))]);
        // Not selected yet: the handle acts as the body
        c.pointer_down_block("b", BlockHit::LeftHandle, p(12.0, 40.0), &data);
        assert_eq!(c.block_state("b"), BlockState::Selected);
        c.pointer_up(p(12.0, 40.0));

        c.pointer_down_block("b", BlockHit::LeftHandle, p(12.0, 40.0), &data);
        assert_eq!(c.block_state("b"), BlockState::ResizingLeft);
        c.pointer_move(p(-30.0, 90.0));
        let ghost = c.ghost().unwrap();
        assert_eq!((ghost.cell_start, ghost.cell_span), (0, 5));
        // Times never change on resize
        assert_eq!((ghost.start_time, ghost.end_time), (480, 540));
        assert_eq!(
            c.pointer_up(p(-30.0, 90.0)),
            Some(TimelineAction::Update {
                id: "b".into(),
                patch: BlockPatch {
                    cell_start: Some(0),
                    cell_span: Some(5),
                    ..Default::default()
                },
            })
        );
        assert_eq!(c.selected(), Some("b"));
    }

    #[test]
    fn left_handle_keeps_at_least_one_cell() {
        let mut c = controller();
        let data = data_with(vec![block("b", 480, 540, (1, 4))]);
        c.pointer_down_block("b", BlockHit::Body, p(20.0, 40.0), &data);
        c.pointer_up(p(20.0, 40.0));
        c.pointer_down_block("b", BlockHit::LeftHandle, p(12.0, 40.0), &data);
        c.pointer_move(p(112.0, 40.0));
        let ghost = c.ghost().unwrap();
        assert_eq!((ghost.cell_start, ghost.cell_span), (4, 1));
    }

    #[test]
    fn right_handle_clamps_span() {
        let mut c = controller();
        let data = data_with(vec![block("b", 480, 540, (2, 2))]);
        c.pointer_down_block("b", BlockHit::Body, p(25.0, 40.0), &data);
        c.pointer_up(p(25.0, 40.0));

        c.pointer_down_block("b", BlockHit::RightHandle, p(38.0, 40.0), &data);
        assert_eq!(c.block_state("b"), BlockState::ResizingRight);
        c.pointer_move(p(138.0, 40.0));
        assert_eq!(c.ghost().unwrap().cell_span, 4);
        c.pointer_move(p(-100.0, 40.0));
        assert_eq!(c.ghost().unwrap().cell_span, 1);
        assert_eq!(c.ghost().unwrap().cell_start, 2);
    }

    #[test]
    fn block_without_lanes_fills_row() {
        let mut c = controller();
        let mut b = block("b", 480, 540, (0, 0));
        b.cell_start = None;
        b.cell_span = None;
        let data = data_with(vec![b]);
        c.pointer_down_block("b", BlockHit::Body, p(30.0, 40.0), &data);
        c.pointer_move(p(60.0, 40.0 + ROW));
        let ghost = c.ghost().unwrap();
        assert_eq!((ghost.cell_start, ghost.cell_span), (0, 6));
        assert_eq!(ghost.start_time, 540);
    }

    #[test]
    fn empty_space_clears_selection() {
        let mut c = controller();
        let data = data_with(vec![block("b", 480, 540, (1, 4))]);
        c.pointer_down_block("b", BlockHit::Body, p(20.0, 40.0), &data);
        c.pointer_up(p(20.0, 40.0));
        c.pointer_down_empty();
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn delete_selected_clears_selection() {
        let mut c = controller();
        let data = data_with(vec![block("b", 480, 540, (1, 4))]);
        assert_eq!(c.delete_selected(), None);
        c.pointer_down_block("b", BlockHit::Body, p(20.0, 40.0), &data);
        c.pointer_up(p(20.0, 40.0));
        assert_eq!(
            c.delete_selected(),
            Some(TimelineAction::Delete("b".into()))
        );
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn forget_missing_drops_dangling_selection() {
        let mut c = controller();
        let data = data_with(vec![block("b", 480, 540, (1, 4))]);
        c.pointer_down_block("b", BlockHit::Body, p(20.0, 40.0), &data);
        c.pointer_up(p(20.0, 40.0));
        c.forget_missing(&data_with(vec![]));
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn block_rect_matches_grid() {
        let l = layout();
        assert_eq!(
            l.block_rect(BlockKind::Done, 540, 600, 1, 4),
            Rect::new(110.0, 48.0, 40.0, 16.0)
        );
        assert_eq!(l.row_at(BlockKind::Plan, -50.0), 0);
        assert!(l.over_trash(p(10.0, 401.0)));
    }

    #[test]
    fn reset_clears_state() {
        let mut c = controller();
        let data = data_with(vec![block("b", 480, 540, (1, 4))]);
        c.pointer_down_block("b", BlockHit::Body, p(20.0, 40.0), &data);
        c.pointer_move(p(20.0, 90.0));
        c.drag_over(&payload(), p(20.0, 20.0));
        c.reset();
        assert_eq!(c.selected(), None);
        assert!(c.ghost().is_none());
        assert!(c.preview().is_none());
    }
}
