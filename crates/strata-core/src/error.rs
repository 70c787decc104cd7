//! Terminal outcomes of a display session.

use thiserror::Error;

/// The first failure a session runs into. None of these are retried.
#[derive(Error, Debug)]
pub enum DisplayError {
    /// The next token in the input was not a well-formed event, or reading it failed.
    #[error("failed to decode status stream: {0}")]
    Decode(#[from] serde_json::Error),

    /// The daemon reported an error; the message is passed through verbatim.
    #[error("{0}")]
    Remote(String),

    /// The output sink rejected a render or a flush.
    #[error("failed to display progress: {0}")]
    Write(#[from] std::io::Error),
}

impl DisplayError {
    /// The remote error message, when the session ended on a remote error.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Remote(msg) => Some(msg),
            _ => None,
        }
    }
}
