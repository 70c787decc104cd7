//! Incremental decoding of the daemon's JSON status stream.
//!
//! Events arrive as concatenated (usually newline-delimited) JSON objects.
//! The decoder pulls exactly one object per call, so a slow network stream is
//! rendered as it arrives rather than after the body completes.

use std::fmt;
use std::io::{BufReader, Read};

use serde_json::de::IoRead;
use serde_json::{Deserializer, StreamDeserializer};

use crate::error::DisplayError;
use crate::message::StatusEvent;

/// Lazy, non-restartable sequence of [`StatusEvent`]s read from a byte stream.
pub struct Decoder<R: Read> {
    stream: StreamDeserializer<'static, IoRead<BufReader<R>>, StatusEvent>,
    finished: bool,
}

impl<R: Read> Decoder<R> {
    /// Wrap a reader. Nothing is read until the first call to [`Decoder::next_event`].
    pub fn new(reader: R) -> Self {
        Self {
            stream: Deserializer::from_reader(BufReader::new(reader)).into_iter(),
            finished: false,
        }
    }

    /// Decode the next event.
    ///
    /// Returns `Ok(None)` once the stream ends cleanly. After an error or the
    /// end of the stream every further call returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Decode`] when the next token is not a
    /// well-formed event or the underlying read fails.
    pub fn next_event(&mut self) -> Result<Option<StatusEvent>, DisplayError> {
        if self.finished {
            return Ok(None);
        }
        match self.stream.next() {
            Some(Ok(event)) => Ok(Some(event)),
            Some(Err(err)) => {
                self.finished = true;
                Err(DisplayError::Decode(err))
            }
            None => {
                self.finished = true;
                Ok(None)
            }
        }
    }

    /// Bytes consumed so far; useful for pointing at a malformed token.
    pub fn byte_offset(&self) -> usize {
        self.stream.byte_offset()
    }
}

impl<R: Read> Iterator for Decoder<R> {
    type Item = Result<StatusEvent, DisplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}

impl<R: Read> std::iter::FusedIterator for Decoder<R> {}

impl<R: Read> fmt::Debug for Decoder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("byte_offset", &self.byte_offset())
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
