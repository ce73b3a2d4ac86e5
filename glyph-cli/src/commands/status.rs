//! Session status command.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::utils;

pub fn execute() -> Result<()> {
    let store = utils::session_store();
    // A corrupt document has already been cleared by the store; both corrupt
    // and absent sessions end up back at the login step.
    let token = store
        .require()
        .context("Not logged in - run `glyph register <EMAIL>` or `glyph login <EMAIL>` first")?;

    println!(
        "{} ({})",
        "Active session".green().bold(),
        token.token_type
    );
    println!("  stored at: {}", store.path().display());
    utils::print_token_summary(&token);
    Ok(())
}
