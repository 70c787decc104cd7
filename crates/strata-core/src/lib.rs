//! strata-core - progress display for streamed daemon status events
//!
//! A pull or push against the daemon answers with a stream of JSON status
//! events, one per sub-operation update (a layer downloading, a manifest
//! being written, ...). This crate turns that stream into terminal output.
//!
//! # Architecture
//!
//! ```text
//! bytes ──▶ Decoder ──▶ Tracker ──▶ Renderer ──▶ Sink
//!           (one event   (latest     (table or    (redraw in place
//!            at a time)   per id)     line)        or append)
//! ```
//!
//! - [`decoder`] - lazy JSON stream decoding
//! - [`tracker`] - per-id state in first-seen order
//! - [`render`] - interactive table and append-only line rendering
//! - [`sink`] - buffered plain and in-place terminal writers
//! - [`session`] - the pull loop tying them together
//!
//! The render mode is probed once per session and never changes.
//!
//! # Example
//!
//! ```
//! use strata_core::{RenderMode, Session};
//!
//! let input = br#"{"id":"layer-1","status":"downloading","progressDetail":{"current":50,"total":100}}
//! {"id":"layer-1","status":"done"}"#;
//!
//! let mut out = Vec::new();
//! Session::new(&mut out, RenderMode::NonInteractive)
//!     .run(&input[..])
//!     .unwrap();
//!
//! assert_eq!(String::from_utf8(out).unwrap(), "layer-1: downloading 50%\nlayer-1: done\n");
//! ```

pub mod decoder;
pub mod error;
pub mod message;
pub mod progress;
pub mod render;
pub mod session;
pub mod sink;
pub mod theme;
pub mod tracker;

pub use decoder::Decoder;
pub use error::DisplayError;
pub use message::{ErrorDetail, ProgressDetail, StatusEvent};
pub use render::{RenderMode, Renderer};
pub use session::{Clock, Session, SessionState, Stopwatch, display_to_stdout};
pub use sink::{Sink, TerminalWriter};
pub use theme::Theme;
pub use tracker::{TrackedEntity, Tracker};
