//! Push command

use anyhow::{Context, Result};

use crate::auth::{CredentialStore, registry_auth};
use crate::client::DaemonClient;
use crate::display;
use crate::reference::Reference;

/// Push `image` and display progress.
pub async fn push(client: &DaemonClient, image: &str) -> Result<()> {
    let reference = Reference::parse(image)?.with_default_tag();
    let auth = registry_auth(
        CredentialStore::default_location().as_ref(),
        reference.registry(),
    );

    let response = client
        .push(&reference.to_string(), &auth)
        .await
        .context("Failed to push image")?;

    display::show(response).await
}
