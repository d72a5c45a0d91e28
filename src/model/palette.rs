use super::planner::Subject;

/// Colors handed out to new subjects, in order
pub const SUBJECT_PALETTE: [&str; 8] = [
    "#86EFAC", "#93C5FD", "#FCA5A5", "#FDE68A", "#C4B5FD", "#F9A8D4", "#FDBA74", "#67E8F9",
];

/// Color for blocks that have neither their own color nor a subject
pub const DEFAULT_BLOCK_COLOR: &str = "#CBD5E1";

/// First palette color no existing subject uses; the first color once all are taken.
pub fn next_subject_color(existing: &[Subject]) -> &'static str {
    SUBJECT_PALETTE
        .iter()
        .copied()
        .find(|c| !existing.iter().any(|s| s.color.eq_ignore_ascii_case(c)))
        .unwrap_or(SUBJECT_PALETTE[0])
}
