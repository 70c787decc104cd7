//! Wire types for the daemon's streamed status events.

use serde::{Deserialize, Serialize};

/// One reported state for one sub-operation (a layer, a manifest, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Sub-operation identifier; events for different ids interleave freely.
    #[serde(default)]
    pub id: String,
    /// Free-form status word, e.g. `downloading` or `done`.
    #[serde(default)]
    pub status: String,
    /// Byte progress, when the daemon knows it.
    #[serde(
        rename = "progressDetail",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub detail: Option<ProgressDetail>,
    /// Remote failure. Only a non-empty message ends the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl StatusEvent {
    /// Build a plain status event without progress or error.
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            detail: None,
            error: None,
        }
    }

    /// Attach byte progress.
    pub fn with_detail(mut self, current: i64, total: i64) -> Self {
        self.detail = Some(ProgressDetail { current, total });
        self
    }

    /// Attach a remote error message.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(ErrorDetail {
            message: message.into(),
        });
        self
    }

    /// The remote error message, if this event carries a non-empty one.
    pub fn error_message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .map(|e| e.message.as_str())
            .filter(|m| !m.is_empty())
    }

    /// Bytes transferred so far, or zero without progress detail.
    pub fn current(&self) -> i64 {
        self.detail.map_or(0, |d| d.current)
    }
}

/// Byte counters for one sub-operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressDetail {
    /// Bytes transferred so far.
    #[serde(default)]
    pub current: i64,
    /// Expected size; zero or negative when unknown.
    #[serde(default)]
    pub total: i64,
}

impl ProgressDetail {
    /// True for the `{}` placeholder daemons attach to plain status events.
    pub fn is_empty(&self) -> bool {
        self.current == 0 && self.total == 0
    }
}

/// Error payload attached to a status event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Human-readable failure, passed through verbatim.
    #[serde(default)]
    pub message: String,
}
