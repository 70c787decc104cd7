//! One display run over one status stream.
//!
//! A session owns its sink, tracker and clock. It pulls one event at a time,
//! records it, renders, and flushes, until the stream ends or the first error.

use std::io::{self, Read, Stdout, Write};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::decoder::Decoder;
use crate::error::DisplayError;
use crate::message::StatusEvent;
use crate::render::{RenderMode, Renderer};
use crate::sink::Sink;
use crate::theme::Theme;
use crate::tracker::Tracker;

/// Source of elapsed time since the session started.
pub trait Clock {
    /// Wall-clock time since the session started.
    fn elapsed(&self) -> Duration;
}

/// [`Clock`] backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    /// Start counting now.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for Stopwatch {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Lifecycle of a session. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting events.
    Running,
    /// The stream ended cleanly.
    Done,
    /// A decode, remote or write error ended the session.
    Failed,
}

/// Pipeline from decoded status events to rendered progress.
#[derive(Debug)]
pub struct Session<W: Write, C: Clock = Stopwatch> {
    sink: Sink<W>,
    renderer: Renderer,
    tracker: Tracker,
    clock: C,
    state: SessionState,
}

impl Session<Stdout> {
    /// Session on the process's stdout, probing it once for a terminal.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let mode = RenderMode::detect(&out);
        let width = if mode.is_interactive() {
            crossterm::terminal::size().ok().map(|(cols, _)| cols)
        } else {
            None
        };
        Session::with_parts(
            Sink::with_width(out, mode, width),
            Renderer::new(mode, Theme::default()),
            Stopwatch::start(),
        )
    }
}

impl<W: Write> Session<W> {
    /// Session on `out` with a fixed mode, timed from now.
    pub fn new(out: W, mode: RenderMode) -> Self {
        Self::with_clock(out, mode, Stopwatch::start())
    }
}

impl<W: Write, C: Clock> Session<W, C> {
    /// Session on `out` with a fixed mode and an injected clock.
    pub fn with_clock(out: W, mode: RenderMode, clock: C) -> Self {
        Self::with_parts(
            Sink::new(out, mode),
            Renderer::new(mode, Theme::default()),
            clock,
        )
    }

    fn with_parts(sink: Sink<W>, renderer: Renderer, clock: C) -> Self {
        debug!(mode = ?renderer.mode(), "display session started");
        Self {
            sink,
            renderer,
            tracker: Tracker::new(),
            clock,
            state: SessionState::Running,
        }
    }

    /// Mode fixed at construction.
    pub fn mode(&self) -> RenderMode {
        self.renderer.mode()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Entities seen so far.
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Record, render and flush one event.
    ///
    /// Events fed after the session reached a terminal state are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Remote`] when the event carries a non-empty
    /// error message, and [`DisplayError::Write`] when rendering or flushing
    /// fails. Either moves the session to [`SessionState::Failed`].
    pub fn feed(&mut self, event: StatusEvent) -> Result<(), DisplayError> {
        if self.state != SessionState::Running {
            debug!(state = ?self.state, id = %event.id, "event after session end ignored");
            return Ok(());
        }
        trace!(id = %event.id, status = %event.status, "status event");

        let (entity, changed) = self.tracker.update(event);
        if let Some(msg) = entity.event.error_message() {
            let err = DisplayError::Remote(msg.to_string());
            self.state = SessionState::Failed;
            debug!(error = %err, "remote reported failure");
            return Err(err);
        }
        let latest = entity.index;

        let elapsed = self.clock.elapsed();
        let result = self
            .renderer
            .render(&mut self.sink, &self.tracker, latest, changed, elapsed)
            .and_then(|()| self.sink.flush());
        if let Err(err) = result {
            self.state = SessionState::Failed;
            debug!(error = %err, "failed to write progress");
            return Err(DisplayError::Write(err));
        }
        Ok(())
    }

    /// Drain `input` until it ends or fails.
    ///
    /// The reader is owned by the session and dropped when this returns, on
    /// success and on every error. A session that already ended does not
    /// read `input` at all.
    ///
    /// # Errors
    ///
    /// Returns the first [`DisplayError`] encountered: a malformed event, a
    /// remote error event, or a failed write.
    pub fn run<R: Read>(&mut self, input: R) -> Result<(), DisplayError> {
        if self.state != SessionState::Running {
            debug!(state = ?self.state, "session already ended");
            return Ok(());
        }
        let mut decoder = Decoder::new(input);
        loop {
            match decoder.next_event() {
                Ok(Some(event)) => self.feed(event)?,
                Ok(None) => {
                    self.state = SessionState::Done;
                    debug!(entities = self.tracker.len(), "status stream finished");
                    return Ok(());
                }
                Err(err) => {
                    self.state = SessionState::Failed;
                    debug!(offset = decoder.byte_offset(), error = %err, "malformed status stream");
                    return Err(err);
                }
            }
        }
    }
}

/// Display a status stream on stdout, choosing the render mode from a
/// terminal probe.
///
/// # Errors
///
/// See [`Session::run`].
pub fn display_to_stdout<R: Read>(input: R) -> Result<(), DisplayError> {
    Session::stdout().run(input)
}
