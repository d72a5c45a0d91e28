use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::gesture::timeline::BlockState;
use crate::model::planner::{BlockKind, CELLS_PER_ROW, TIMELINE_START_MINUTE, TOTAL_HOURS};
use crate::ops::derive;
use crate::tui::app::{App, BlockRegion};
use crate::util::unicode;

/// Hour labels between the plan and done columns
const GUTTER_WIDTH: u16 = 4;

/// One block (or ghost/preview) ready to draw
struct BlockDraw {
    id: Option<String>,
    rect: Rect,
    label: String,
    color: Color,
    state: BlockState,
}

/// Terminal rect of a block inside column `col`. Lanes are rounded to the
/// nearest terminal column; rows past the visible grid are clipped.
fn cell_rect(col: Rect, start_time: u32, end_time: u32, cell_start: u8, cell_span: u8) -> Option<Rect> {
    let lanes = u32::from(CELLS_PER_ROW);
    let lane_x = |lane: u32| col.x + ((lane * u32::from(col.width) + lanes / 2) / lanes) as u16;
    let x0 = lane_x(u32::from(cell_start));
    let x1 = lane_x(u32::from(cell_start) + u32::from(cell_span)).max(x0 + 1);

    let top = start_time.saturating_sub(TIMELINE_START_MINUTE) / 60;
    if top >= u32::from(col.height) {
        return None;
    }
    let rows = end_time.saturating_sub(start_time).div_ceil(60).max(1);
    let height = rows.min(u32::from(col.height) - top);
    Some(Rect::new(x0, col.y + top as u16, x1 - x0, height as u16))
}

/// Render the plan | hours | done grid and the trash footer
pub fn render_timeline(frame: &mut Frame, app: &mut App, area: Rect) {
    if area.width < GUTTER_WIDTH + 2 * u16::from(CELLS_PER_ROW) || area.height < 3 {
        return;
    }
    let col_width = (area.width - GUTTER_WIDTH) / 2;
    let rows_y = area.y + 1;
    let visible = (area.height - 2).min(TOTAL_HOURS as u16);
    let plan = Rect::new(area.x, rows_y, col_width, visible);
    let gutter = Rect::new(area.x + col_width, rows_y, GUTTER_WIDTH, visible);
    let done = Rect::new(
        gutter.x + GUTTER_WIDTH,
        rows_y,
        area.width - col_width - GUTTER_WIDTH,
        visible,
    );
    let trash = Rect::new(area.x, rows_y + visible, area.width, 1);
    app.set_timeline_regions(plan, done, trash);

    render_grid(frame, app, area, plan, gutter, done);

    let mut regions = Vec::new();
    for (kind, col) in [(BlockKind::Plan, plan), (BlockKind::Done, done)] {
        for draw in collect_blocks(app, kind, col) {
            render_block(frame, app, &draw);
            if let Some(id) = draw.id {
                regions.push(BlockRegion { id, rect: draw.rect });
            }
        }
    }
    app.hits.blocks = regions;

    render_trash(frame, app, trash);
}

fn render_grid(frame: &mut Frame, app: &App, area: Rect, plan: Rect, gutter: Rect, done: Rect) {
    let theme = &app.theme;
    let bg = Style::default().bg(theme.background);

    // Column titles
    let title = |text: &str, width: u16| {
        Span::styled(
            format!("{:^w$}", text, w = width as usize),
            bg.fg(theme.dim).add_modifier(Modifier::BOLD),
        )
    };
    let titles = Line::from(vec![
        title("plan", plan.width),
        Span::styled(" ".repeat(gutter.width as usize), bg),
        title("done", done.width),
    ]);
    frame.render_widget(
        Paragraph::new(titles).style(bg),
        Rect::new(area.x, area.y, area.width, 1),
    );

    // Hour rows: lane dots, then the hour label in the gutter
    let lane_dots = |width: u16| -> String {
        (0..width)
            .map(|i| {
                let lanes = u32::from(CELLS_PER_ROW);
                let on_lane = (0..lanes)
                    .any(|l| ((l * u32::from(width) + lanes / 2) / lanes) as u16 == i);
                if on_lane { '·' } else { ' ' }
            })
            .collect()
    };
    let plan_dots = lane_dots(plan.width);
    let done_dots = lane_dots(done.width);
    for row in 0..u32::from(plan.height) {
        let label = derive::format_hour_label(derive::row_hour(row));
        let line = Line::from(vec![
            Span::styled(plan_dots.clone(), bg.fg(theme.grid)),
            Span::styled(format!(" {:>2} ", label), bg.fg(theme.dim)),
            Span::styled(done_dots.clone(), bg.fg(theme.grid)),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(bg),
            Rect::new(area.x, plan.y + row as u16, area.width, 1),
        );
    }
}

/// Stored blocks of one column, then the moving ghost and the drop preview
fn collect_blocks(app: &App, kind: BlockKind, col: Rect) -> Vec<BlockDraw> {
    let data = app.store.data();
    let mut draws = Vec::new();
    for block in derive::renderable_blocks(data, kind) {
        let (cell_start, cell_span) = block.lanes();
        let Some(rect) = cell_rect(col, block.start_time, block.end_time, cell_start, cell_span)
        else {
            continue;
        };
        draws.push(BlockDraw {
            id: Some(block.id.clone()),
            rect,
            label: derive::block_label(block, data).to_string(),
            color: app.theme.swatch(derive::resolve_block_color(block, &data.subjects)),
            state: app.timeline.block_state(&block.id),
        });
    }

    if let Some(ghost) = app.timeline.ghost().filter(|g| g.kind == kind)
        && let Some(block) = data.block(&ghost.id)
        && let Some(rect) = cell_rect(
            col,
            ghost.start_time,
            ghost.end_time,
            ghost.cell_start,
            ghost.cell_span,
        )
    {
        draws.push(BlockDraw {
            id: None,
            rect,
            label: derive::block_label(block, data).to_string(),
            color: app.theme.swatch(derive::resolve_block_color(block, &data.subjects)),
            state: BlockState::Selected,
        });
    }

    if let Some(preview) = app.timeline.preview().filter(|p| p.kind == kind)
        && let Some(rect) = cell_rect(
            col,
            preview.start_time,
            preview.end_time,
            preview.cell_start.unwrap_or(0),
            preview.cell_span.unwrap_or(CELLS_PER_ROW),
        )
    {
        draws.push(BlockDraw {
            id: None,
            rect,
            label: format!("+ {}", preview.label.as_deref().unwrap_or("")),
            color: app.theme.dim,
            state: BlockState::Idle,
        });
    }
    draws
}

fn render_block(frame: &mut Frame, app: &App, draw: &BlockDraw) {
    let theme = &app.theme;
    let width = draw.rect.width as usize;
    let mut style = Style::default().fg(theme.block_text).bg(draw.color);
    let text = match draw.state {
        BlockState::Idle => unicode::fit_to_width(&draw.label, width),
        BlockState::Dragging => {
            // The original stays behind as an outline while the ghost moves
            style = Style::default().fg(draw.color).bg(theme.background);
            unicode::fit_to_width(&draw.label, width)
        }
        BlockState::Selected | BlockState::ResizingLeft | BlockState::ResizingRight => {
            style = style.add_modifier(Modifier::BOLD);
            if width >= 3 {
                format!("◂{}▸", unicode::fit_to_width(&draw.label, width - 2))
            } else {
                unicode::fit_to_width(&draw.label, width)
            }
        }
    };
    frame.render_widget(Paragraph::new(Span::raw(text)).style(style), draw.rect);
}

fn render_trash(frame: &mut Frame, app: &App, area: Rect) {
    if !app.timeline.is_moving() {
        return;
    }
    let theme = &app.theme;
    let style = if app.timeline.trash_hot() {
        Style::default().fg(theme.text_bright).bg(theme.red)
    } else {
        Style::default().fg(theme.red).bg(theme.background)
    };
    let text = format!("{:^w$}", "✕ drop here to delete", w = area.width as usize);
    frame.render_widget(Paragraph::new(Span::raw(text)).style(style), area);
}
