//! Pull command

use anyhow::{Context, Result};
use tracing::info;

use crate::auth::{CredentialStore, registry_auth};
use crate::client::DaemonClient;
use crate::display;
use crate::reference::Reference;

/// Pull `image` and display progress.
///
/// With `only_missing`, the daemon is asked first and the pull is skipped
/// when it already has the image.
pub async fn pull(client: &DaemonClient, image: &str, only_missing: bool) -> Result<()> {
    if only_missing
        && client
            .image_exists(image)
            .await
            .with_context(|| format!("Failed to inspect image {image}"))?
    {
        info!(image, "image already present, skipping pull");
        return Ok(());
    }

    let reference = Reference::parse(image)?
        .with_default_tag()
        .trim_tag_for_digest();
    let (name, tag) = pull_target(&reference);

    let auth = registry_auth(
        CredentialStore::default_location().as_ref(),
        reference.registry(),
    );
    let response = client
        .pull(&name, &tag, &auth)
        .await
        .context("Failed to pull image")?;

    display::show(response).await
}

/// Split a normalized reference into the daemon's `fromImage` and `tag`.
///
/// Digest references travel whole in `fromImage` with an empty tag.
pub fn pull_target(reference: &Reference) -> (String, String) {
    match reference.tag() {
        Some(tag) => (reference.name().to_string(), tag.to_string()),
        None => (reference.to_string(), String::new()),
    }
}
