//! Server command handler.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::ResolvedConfig;
use crate::server::{self, AppState};
use crate::translation::{OciChatClient, Translator};

/// Wires the model client into a translator and serves HTTP until shutdown.
pub async fn run_serve(config: ResolvedConfig) -> Result<()> {
    let client = OciChatClient::new(config.oci_settings()?)
        .context("Failed to create model client")?;

    info!(
        model = %config.model_id,
        endpoint = %client.url(),
        timeout_secs = config.timeout.as_secs(),
        auth = config.auth.kind(),
        "model client ready"
    );

    let translator = Translator::new(Arc::new(client), config.timeout);
    server::serve(&config.host, config.port, AppState::new(translator)).await
}
