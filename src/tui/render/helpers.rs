use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// `left` flush left and `right` flush right on a line `width` wide.
/// The right side is dropped when both don't fit.
pub(super) fn split_line<'a>(
    mut left: Vec<Span<'a>>,
    right: Vec<Span<'a>>,
    width: usize,
    fill: Style,
) -> Line<'a> {
    let left_width = spans_width(&left);
    let right_width = spans_width(&right);
    if left_width + right_width < width {
        left.push(Span::styled(
            " ".repeat(width - left_width - right_width),
            fill,
        ));
        left.extend(right);
    }
    Line::from(left)
}
