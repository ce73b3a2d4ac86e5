//! Logout command.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::utils;

pub fn execute() -> Result<()> {
    let store = utils::session_store();
    store.clear().context("Failed to clear session token")?;
    println!("{}", "Logged out".green());
    Ok(())
}
