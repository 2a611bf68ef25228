use crate::{
    cli::globals::GlobalArgs,
    client::HttpVerificationClient,
    flow::platform::Destinations,
    snowpro::{self, render::Renderer, AppState},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub api_url: String,
    pub api_token: Option<SecretString>,
    pub api_timeout: Option<Duration>,
    pub destinations: Destinations,
}

/// Execute the server action.
///
/// # Errors
/// Returns an error if the API client or templates cannot be initialized or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let mut globals = GlobalArgs::new(args.api_url);

    if let Some(token) = args.api_token {
        globals.set_token(token);
    }

    debug!("Global args: {:?}", globals);

    let client = HttpVerificationClient::new(&globals, args.api_timeout)
        .context("Failed to build verification API client")?;

    let renderer = Renderer::new().context("Failed to load page templates")?;

    let state = AppState::new(client, renderer, args.destinations).with_api_url(globals.api_url);

    snowpro::new(args.port, Arc::new(state)).await
}
