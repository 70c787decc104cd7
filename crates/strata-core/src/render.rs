//! Rendering of tracked status events.
//!
//! The render mode is fixed when the session starts. Interactive output
//! redraws the whole table on every event; non-interactive output appends a
//! line only when an id's status text changes.

use std::io::{self, Write};
use std::time::Duration;

use comfy_table::{Table, presets};
use crossterm::tty::IsTty;

use crate::progress::{format_detail, format_status_line, reported_detail};
use crate::theme::{Theme, clamp_bytes, format_elapsed, format_rate, format_size};
use crate::tracker::{TrackedEntity, Tracker};

/// How a session draws progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Full table redrawn in place, with a summary row.
    Interactive,
    /// Append-only lines for status changes, no summary.
    NonInteractive,
}

impl RenderMode {
    /// Probe whether `output` is an interactive terminal.
    pub fn detect<T: IsTty + ?Sized>(output: &T) -> Self {
        Self::from_terminal(output.is_tty())
    }

    /// Map a capability flag to a mode.
    pub fn from_terminal(is_terminal: bool) -> Self {
        if is_terminal {
            Self::Interactive
        } else {
            Self::NonInteractive
        }
    }

    /// Whether this mode redraws in place.
    pub fn is_interactive(self) -> bool {
        matches!(self, Self::Interactive)
    }
}

/// Draws tracker state for one mode.
#[derive(Debug, Clone)]
pub struct Renderer {
    mode: RenderMode,
    theme: Theme,
}

impl Renderer {
    /// Create a renderer for a fixed mode.
    pub fn new(mode: RenderMode, theme: Theme) -> Self {
        Self { mode, theme }
    }

    /// The mode chosen at construction.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Draw the effect of the event that just updated entity `latest`.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    pub fn render<W: Write + ?Sized>(
        &self,
        out: &mut W,
        tracker: &Tracker,
        latest: usize,
        changed: bool,
        elapsed: Duration,
    ) -> io::Result<()> {
        match self.mode {
            RenderMode::Interactive => self.render_table(out, tracker, elapsed),
            RenderMode::NonInteractive => {
                if !changed {
                    return Ok(());
                }
                match tracker.at(latest) {
                    Some(entity) => render_line(out, entity),
                    None => Ok(()),
                }
            }
        }
    }

    /// Draw every tracked entity in first-seen order plus the summary row.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    pub fn render_table<W: Write + ?Sized>(
        &self,
        out: &mut W,
        tracker: &Tracker,
        elapsed: Duration,
    ) -> io::Result<()> {
        let mut table = Table::new();
        table.load_preset(presets::NOTHING).force_no_tty();

        for entity in tracker.iter() {
            let detail = reported_detail(&entity.event)
                .map(|d| format_detail(d, &self.theme))
                .unwrap_or_default();
            table.add_row(vec![
                format!("{}:", entity.id()),
                entity.event.status.clone(),
                detail,
            ]);
        }

        let total = clamp_bytes(tracker.total_current());
        let rate = format_rate(total, elapsed).unwrap_or_else(|| self.theme.no_rate.to_string());
        table.add_row(vec![
            format!("elapsed: {}", format_elapsed(elapsed)),
            format!("total: {}", format_size(total)),
            format!("({rate})"),
        ]);

        for column in table.column_iter_mut() {
            column.set_padding((0, 1));
        }

        for line in table.to_string().lines() {
            writeln!(out, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderMode::NonInteractive, Theme::default())
    }
}

fn render_line<W: Write + ?Sized>(out: &mut W, entity: &TrackedEntity) -> io::Result<()> {
    writeln!(out, "{}: {}", entity.id(), format_status_line(&entity.event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::StatusEvent;

    fn render(renderer: &Renderer, tracker: &mut Tracker, event: StatusEvent) -> String {
        let (entity, changed) = tracker.update(event);
        let latest = entity.index;
        let mut out = Vec::new();
        renderer
            .render(&mut out, tracker, latest, changed, Duration::from_secs(2))
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_mode_from_terminal() {
        assert_eq!(RenderMode::from_terminal(true), RenderMode::Interactive);
        assert_eq!(RenderMode::from_terminal(false), RenderMode::NonInteractive);
        assert!(RenderMode::Interactive.is_interactive());
        assert!(!RenderMode::NonInteractive.is_interactive());
    }

    #[test]
    fn test_line_mode_skips_unchanged_status() {
        let renderer = Renderer::new(RenderMode::NonInteractive, Theme::default());
        let mut tracker = Tracker::new();

        let out = render(
            &renderer,
            &mut tracker,
            StatusEvent::new("a", "downloading").with_detail(50, 100),
        );
        assert_eq!(out, "a: downloading 50%\n");

        let out = render(
            &renderer,
            &mut tracker,
            StatusEvent::new("a", "downloading").with_detail(100, 100),
        );
        assert!(out.is_empty());

        let out = render(&renderer, &mut tracker, StatusEvent::new("a", "done"));
        assert_eq!(out, "a: done\n");
    }

    #[test]
    fn test_line_mode_prints_only_latest_entity() {
        let renderer = Renderer::default();
        let mut tracker = Tracker::new();
        render(&renderer, &mut tracker, StatusEvent::new("a", "waiting"));
        let out = render(&renderer, &mut tracker, StatusEvent::new("b", "waiting"));
        assert_eq!(out, "b: waiting\n");
    }

    #[test]
    fn test_table_mode_redraws_all_rows_with_summary() {
        let renderer = Renderer::new(RenderMode::Interactive, Theme::default());
        let mut tracker = Tracker::new();
        render(
            &renderer,
            &mut tracker,
            StatusEvent::new("layer-1", "downloading").with_detail(1024, 2048),
        );
        let out = render(&renderer, &mut tracker, StatusEvent::new("layer-2", "waiting"));

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("layer-1:"));
        assert!(lines[0].contains("downloading"));
        assert!(lines[0].contains(" 50%"));
        assert!(lines[1].starts_with("layer-2:"));
        assert!(lines[1].ends_with("waiting"));
        assert!(lines[2].starts_with("elapsed: 2.0s"));
        assert!(lines[2].contains("total: 1.0 KB"));
        assert!(lines[2].ends_with("(512 B/s)"));
    }

    #[test]
    fn test_table_row_omits_placeholder_detail() {
        let renderer = Renderer::new(RenderMode::Interactive, Theme::default());
        let mut tracker = Tracker::new();
        let event = StatusEvent::new("a", "Pull complete").with_detail(0, 0);
        let out = render(&renderer, &mut tracker, event);

        let row = out.lines().next().unwrap();
        assert!(row.ends_with("Pull complete"));
        assert!(!row.contains(" B"));
    }

    #[test]
    fn test_table_columns_are_aligned() {
        let renderer = Renderer::new(RenderMode::Interactive, Theme::default());
        let mut tracker = Tracker::new();
        tracker.update(StatusEvent::new("a", "waiting"));
        tracker.update(StatusEvent::new("longer-id", "waiting"));

        let mut out = Vec::new();
        renderer
            .render_table(&mut out, &tracker, Duration::from_secs(1))
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let columns: Vec<usize> = text
            .lines()
            .take(2)
            .map(|l| l.find("waiting").unwrap())
            .collect();
        assert_eq!(columns[0], columns[1]);
    }

    #[test]
    fn test_table_mode_without_elapsed_time_has_no_rate() {
        let renderer = Renderer::new(RenderMode::Interactive, Theme::default());
        let mut tracker = Tracker::new();
        tracker.update(StatusEvent::new("a", "downloading").with_detail(10, 100));

        let mut out = Vec::new();
        renderer
            .render_table(&mut out, &tracker, Duration::ZERO)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().last().unwrap().ends_with("(-/s)"));
    }
}
