//! Common helpers shared across CLI commands.

use anyhow::Result;
use colored::{ColoredString, Colorize};
use glyph_core::{
    expected_band, factor_label, ApiClient, AssuranceLevel, GlyphToken, RiskBand,
    TokenSessionStore, TrustSignal,
};

pub fn api_client() -> Result<ApiClient> {
    Ok(ApiClient::from_env()?)
}

pub fn session_store() -> TokenSessionStore {
    TokenSessionStore::from_env()
}

fn level_badge(level: AssuranceLevel) -> ColoredString {
    match level {
        AssuranceLevel::Gamma => "gamma".green().bold(),
        AssuranceLevel::Beta => "beta".yellow().bold(),
        AssuranceLevel::Alpha => "alpha".red().bold(),
    }
}

fn band_badge(band: RiskBand) -> ColoredString {
    match band {
        RiskBand::Low => "low".green(),
        RiskBand::Medium => "medium".yellow(),
        RiskBand::High => "high".red().bold(),
    }
}

/// Print the assurance summary for a token, plus trust signals if carried.
pub fn print_token_summary(token: &GlyphToken) {
    let assurance = &token.aegis_assurance;

    println!("{}", "Assurance".bold());
    println!("  score:     {} / 100", assurance.clamped_score());
    println!("  level:     {}", level_badge(assurance.level));
    let factors: Vec<&str> = assurance.factors.iter().map(|f| factor_label(f)).collect();
    println!(
        "  factors:   {}",
        if factors.is_empty() {
            "none".to_string()
        } else {
            factors.join(", ")
        }
    );
    println!("  freshness: {} days", assurance.freshness_days);

    if let Some(warning) = assurance.consistency() {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }

    if let Some(signals) = token.trust_signals() {
        print_trust_signals(signals);
    }
}

fn print_trust_signals(signals: &TrustSignal) {
    let risk = &signals.risk;
    println!("{}", "Trust signals".bold());
    println!("  risk band:  {}", band_badge(risk.band));
    println!("  risk score: {}", risk.score);
    println!(
        "  updated:    {}",
        risk.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if !risk.band_matches() {
        eprintln!(
            "{} risk band {} does not match score {} (expected {})",
            "warning:".yellow().bold(),
            risk.band,
            risk.score,
            expected_band(risk.score)
        );
    }
}
