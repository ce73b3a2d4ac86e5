//! Federated login command.
//!
//! The OAuth flow runs in a browser; the CLI only prints the entry URL.

use anyhow::Result;
use colored::Colorize;
use glyph_core::OauthProvider;

use crate::utils;

pub fn execute(provider: String) -> Result<()> {
    let provider: OauthProvider = provider.parse()?;
    let api = utils::api_client()?;

    println!(
        "Open this URL in your browser to continue with {}:",
        provider.to_string().bold()
    );
    println!("  {}", api.login_url(provider).underline());
    println!("The session token is issued at the end of the browser flow.");
    Ok(())
}
