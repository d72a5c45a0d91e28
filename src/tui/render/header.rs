use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::planner::{BlockKind, TimelineBlock};
use crate::ops::derive;
use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::split_line;

/// Date and D-day, the daily quote, then the day's totals
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let theme = &app.theme;
    let bg = Style::default().bg(theme.background);
    let width = area.width as usize;
    let data = app.store.data();
    let info = &data.daily_info;

    let date = vec![Span::styled(
        format!(" {}", derive::format_korean_date(info.date)),
        bg.fg(theme.text_bright).add_modifier(Modifier::BOLD),
    )];
    let dday = match &info.dday {
        Some(d) => {
            let value = derive::dday_value(info.date, d.target_date);
            let color = if value < 0 { theme.dim } else { theme.yellow };
            vec![
                Span::styled(
                    derive::format_dday(value),
                    bg.fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {} ", d.label), bg.fg(theme.text)),
            ]
        }
        None => Vec::new(),
    };
    let mut lines = vec![split_line(date, dday, width, bg)];

    let quote = if info.daily_quote.is_empty() {
        Span::styled(" (no quote, Q to set)", bg.fg(theme.dim))
    } else {
        Span::styled(
            unicode::truncate_to_width(&format!(" \u{201C}{}\u{201D}", info.daily_quote), width),
            bg.fg(theme.text).add_modifier(Modifier::ITALIC),
        )
    };
    lines.push(Line::from(quote));

    let planned: u32 = data
        .timeline_blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Plan)
        .map(TimelineBlock::duration)
        .sum();
    lines.push(Line::from(vec![
        Span::styled(" study ", bg.fg(theme.dim)),
        Span::styled(
            derive::format_duration(derive::study_minutes(&data.timeline_blocks)),
            bg.fg(theme.green),
        ),
        Span::styled("  plan ", bg.fg(theme.dim)),
        Span::styled(derive::format_duration(planned), bg.fg(theme.highlight)),
    ]));

    frame.render_widget(Paragraph::new(lines).style(bg), area);
}
