//! Hands a streaming daemon response to the blocking display engine.
//!
//! The display session is a synchronous pull loop, so it runs on a blocking
//! worker with the async body bridged into a `Read`. The body is owned by the
//! worker and closed when the session returns, however it ends.

use std::io::{self, Read};

use anyhow::{Context, Result};
use futures::TryStreamExt;
use reqwest::Response;
use strata_core::DisplayError;
use tokio_util::io::{StreamReader, SyncIoBridge};

/// Blocking reader over a streaming response body.
pub type BodyReader = Box<dyn Read + Send>;

/// Run `display` on a blocking worker over the body of `response`.
pub async fn with_body<T, F>(response: Response, display: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(BodyReader) -> Result<T, DisplayError> + Send + 'static,
{
    let stream = Box::pin(response.bytes_stream().map_err(io::Error::other));
    let reader: BodyReader = Box::new(SyncIoBridge::new(StreamReader::new(stream)));

    let outcome = tokio::task::spawn_blocking(move || display(reader))
        .await
        .context("Display task failed")?;
    Ok(outcome?)
}

/// Render the status stream of `response` on stdout.
pub async fn show(response: Response) -> Result<()> {
    with_body(response, strata_core::display_to_stdout).await
}
