//! Passkey authentication command.

use anyhow::{Context, Result};
use colored::Colorize;
use glyph_core::{CeremonyAdapter, SoftwareAuthenticator};
use tracing::info;

use crate::utils;

pub async fn execute(email: String, seed: u64) -> Result<()> {
    let api = utils::api_client()?;
    let adapter = CeremonyAdapter::new(api, SoftwareAuthenticator::new(seed));

    println!("Authenticating {} ...", email.bold());
    let token = adapter
        .authenticate(&email)
        .await
        .context("Authentication ceremony failed")?;

    let store = utils::session_store();
    store
        .save(&token)
        .context("Failed to persist session token")?;
    info!(path = %store.path().display(), "Session token saved");

    println!("{}", "✓ Authentication complete".green().bold());
    utils::print_token_summary(&token);
    Ok(())
}
