//! Output sinks: a plain buffered writer, or a terminal writer that redraws
//! its last frame in place.

use std::io::{self, BufWriter, Write};

use crossterm::{
    QueueableCommand,
    cursor::{MoveToColumn, MoveUp},
    terminal::{Clear, ClearType},
};

use crate::render::RenderMode;

/// Buffered destination for one session, chosen once from the render mode.
#[derive(Debug)]
pub enum Sink<W: Write> {
    /// Append-only buffered output.
    Plain(BufWriter<W>),
    /// In-place redrawing terminal output.
    Terminal(TerminalWriter<W>),
}

impl<W: Write> Sink<W> {
    /// Wrap `out` for the given mode.
    pub fn new(out: W, mode: RenderMode) -> Self {
        Self::with_width(out, mode, None)
    }

    /// Wrap `out` for the given mode, wrapping redrawn lines at `width` columns.
    pub fn with_width(out: W, mode: RenderMode, width: Option<u16>) -> Self {
        match mode {
            RenderMode::Interactive => {
                Self::Terminal(TerminalWriter::new(out).with_width(width))
            }
            RenderMode::NonInteractive => Self::Plain(BufWriter::new(out)),
        }
    }
}

impl<W: Write> Write for Sink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            Self::Terminal(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Terminal(w) => w.flush(),
        }
    }
}

/// Collects one frame of output and, on flush, replaces the previously drawn
/// frame with it.
///
/// The cursor is moved up over the rows of the last frame, everything below
/// is cleared, and the new frame is written. Rows longer than the terminal
/// width occupy several screen lines, so the width is needed to move up the
/// right amount.
#[derive(Debug)]
pub struct TerminalWriter<W: Write> {
    out: W,
    frame: Vec<u8>,
    drawn_rows: u16,
    width: Option<u16>,
}

impl<W: Write> TerminalWriter<W> {
    /// Wrap a terminal device with unknown width.
    pub fn new(out: W) -> Self {
        Self {
            out,
            frame: Vec::new(),
            drawn_rows: 0,
            width: None,
        }
    }

    /// Set the terminal width used to account for wrapped lines.
    pub fn with_width(mut self, width: Option<u16>) -> Self {
        self.width = width.filter(|&w| w > 0);
        self
    }

    fn redraw(&mut self) -> io::Result<()> {
        if self.drawn_rows > 0 {
            self.out.queue(MoveUp(self.drawn_rows))?;
        }
        self.out.queue(MoveToColumn(0))?;
        self.out.queue(Clear(ClearType::FromCursorDown))?;
        self.out.write_all(&self.frame)?;

        self.drawn_rows = count_rows(&self.frame, self.width);
        self.frame.clear();
        Ok(())
    }
}

impl<W: Write> Write for TerminalWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.frame.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.frame.is_empty() {
            self.redraw()?;
        }
        self.out.flush()
    }
}

/// Screen rows taken by the newline-terminated lines of `frame`.
fn count_rows(frame: &[u8], width: Option<u16>) -> u16 {
    let text = String::from_utf8_lossy(frame);
    let mut rows: usize = 0;
    for line in text.split_inclusive('\n').filter(|l| l.ends_with('\n')) {
        let chars = line.trim_end_matches('\n').chars().count();
        rows += match width {
            Some(w) if chars > 0 => chars.div_ceil(usize::from(w)),
            _ => 1,
        };
    }
    u16::try_from(rows).unwrap_or(u16::MAX)
}
