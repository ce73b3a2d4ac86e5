//! Passkey registration command.

use anyhow::{Context, Result};
use colored::Colorize;
use glyph_core::{CeremonyAdapter, SoftwareAuthenticator};
use tracing::info;

use crate::utils;

pub async fn execute(email: String, seed: u64) -> Result<()> {
    let api = utils::api_client()?;
    let adapter = CeremonyAdapter::new(api, SoftwareAuthenticator::new(seed));

    println!("Registering passkey for {} ...", email.bold());
    let token = adapter
        .register(&email)
        .await
        .context("Registration ceremony failed")?;

    let store = utils::session_store();
    store
        .save(&token)
        .context("Failed to persist session token")?;
    info!(path = %store.path().display(), "Session token saved");

    println!("{}", "✓ Registration complete".green().bold());
    utils::print_token_summary(&token);
    Ok(())
}
