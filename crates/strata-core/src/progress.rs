//! Progress indicators for a single status row.

use super::message::{ProgressDetail, StatusEvent};
use super::theme::{BarGlyphs, Theme, clamp_bytes, format_size};

/// Completion percentage, capped at 100. `None` when the total is unknown.
pub fn percent(detail: ProgressDetail) -> Option<u64> {
    let total = clamp_bytes(detail.total);
    if total == 0 {
        return None;
    }
    let current = u128::from(clamp_bytes(detail.current));
    Some((current * 100 / u128::from(total)).min(100) as u64)
}

/// Format a fixed-width progress bar.
pub fn format_progress_bar(current: u64, total: u64, width: usize, glyphs: &BarGlyphs) -> String {
    let filled = if total > 0 {
        ((current.min(total) as f64 / total as f64) * width as f64).round() as usize
    } else {
        0
    };
    let empty = width.saturating_sub(filled);
    format!("{}{}", glyphs.filled.repeat(filled), glyphs.empty.repeat(empty))
}

/// Bar, percentage and sizes for a table cell, e.g. `▓▓░░  50%  1.0 KB/2.0 KB`.
pub fn format_detail(detail: ProgressDetail, theme: &Theme) -> String {
    let current = clamp_bytes(detail.current);
    match percent(detail) {
        Some(pct) => {
            let total = clamp_bytes(detail.total);
            let bar = format_progress_bar(current, total, theme.bar_width, &theme.bar);
            format!(
                "{bar} {pct:>3}%  {}/{}",
                format_size(current),
                format_size(total)
            )
        }
        None => format_size(current),
    }
}

/// Progress worth showing for `event`; an all-zero detail counts as none.
pub fn reported_detail(event: &StatusEvent) -> Option<ProgressDetail> {
    event.detail.filter(|detail| !detail.is_empty())
}

/// One-line status for append-only output, e.g. `downloading 50%`.
pub fn format_status_line(event: &StatusEvent) -> String {
    match reported_detail(event) {
        Some(detail) => match percent(detail) {
            Some(pct) => format!("{} {pct}%", event.status),
            None => format!(
                "{} {}",
                event.status,
                format_size(clamp_bytes(detail.current))
            ),
        },
        None => event.status.clone(),
    }
}
