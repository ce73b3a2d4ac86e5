//! Trust-signal settings commands.
//!
//! The CLI is one-shot, so edits refresh the registry from the backend,
//! stage the change and save in a single run. Settings are submitted as one
//! document; a failed save leaves the backend state untouched.

use anyhow::{Context, Result};
use colored::Colorize;
use glyph_core::TrustSignalRegistry;

use crate::utils;

pub async fn list() -> Result<()> {
    let api = utils::api_client()?;
    let mut registry = TrustSignalRegistry::new();

    // Defaults are shown when the backend is unreachable.
    if let Err(err) = registry.refresh(&api).await {
        eprintln!(
            "{} backend unreachable, showing defaults ({err})",
            "warning:".yellow().bold()
        );
    }

    println!("{}", "Trust signals".bold());
    for signal in registry.signals() {
        let state = if signal.enabled {
            "on ".green()
        } else {
            "off".red()
        };
        println!(
            "  [{state}] {:<20} {:<16} weight {:>3}",
            signal.id, signal.provider, signal.weight
        );
        println!("        {}", signal.description.dimmed());
    }

    let privacy = registry.privacy();
    println!("{}", "Privacy".bold());
    println!("  share with token: {}", privacy.share_trust_signals);
    println!("  anonymize data:   {}", privacy.anonymize_data);
    println!("  retention:        {} days", privacy.retention_days);
    Ok(())
}

pub async fn toggle(id: String) -> Result<()> {
    let api = utils::api_client()?;
    let mut registry = TrustSignalRegistry::new();
    registry
        .refresh(&api)
        .await
        .context("Failed to fetch current settings")?;

    let enabled = registry.toggle(&id)?;
    registry
        .save(&api)
        .await
        .context("Failed to save settings")?;

    println!(
        "{} {}",
        id.bold(),
        if enabled {
            "enabled".green()
        } else {
            "disabled".yellow()
        }
    );
    Ok(())
}

pub async fn retention(days: u32) -> Result<()> {
    // Out-of-range input is rejected here, before any network call.
    let mut registry = TrustSignalRegistry::new();
    registry.set_retention(days)?;

    let api = utils::api_client()?;
    registry
        .refresh(&api)
        .await
        .context("Failed to fetch current settings")?;

    // Refresh replaced the staged state; stage the already-validated value.
    registry.set_retention(days)?;
    registry
        .save(&api)
        .await
        .context("Failed to save settings")?;

    println!("Retention set to {} days", days.to_string().bold());
    Ok(())
}
