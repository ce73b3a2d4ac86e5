//! Glyph CLI - multi-factor authentication and identity assurance client.

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod exit_codes;
mod utils;

#[derive(Parser)]
#[command(name = "glyph")]
#[command(author, version, about = "Glyph identity assurance client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new passkey and start a session
    Register {
        /// Email address to enroll
        #[arg(value_name = "EMAIL")]
        email: String,

        /// Seed for the deterministic software authenticator
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Authenticate with a registered passkey and start a session
    Login {
        /// Email address to authenticate
        #[arg(value_name = "EMAIL")]
        email: String,

        /// Seed for the deterministic software authenticator
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Print the federated login URL for a provider
    Oauth {
        /// Provider: google, microsoft, github or twitter
        #[arg(value_name = "PROVIDER")]
        provider: String,
    },

    /// Show the current session and assurance score
    Status,

    /// Inspect and edit trust-signal settings
    Signals {
        #[command(subcommand)]
        action: SignalsAction,
    },

    /// Clear the persisted session token
    Logout,
}

#[derive(Subcommand)]
enum SignalsAction {
    /// List trust signals and privacy settings
    List,

    /// Toggle a signal on or off
    Toggle {
        /// Signal id, e.g. device_reputation
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Set the trust-signal retention period in days (30-365)
    Retention {
        #[arg(value_name = "DAYS")]
        days: u32,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("glyph=info,glyph_core=warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Register { email, seed } => commands::register::execute(email, seed).await,
        Commands::Login { email, seed } => commands::login::execute(email, seed).await,
        Commands::Oauth { provider } => commands::oauth::execute(provider),
        Commands::Status => commands::status::execute(),
        Commands::Signals { action } => match action {
            SignalsAction::List => commands::signals::list().await,
            SignalsAction::Toggle { id } => commands::signals::toggle(id).await,
            SignalsAction::Retention { days } => commands::signals::retention(days).await,
        },
        Commands::Logout => commands::logout::execute(),
    };

    if let Err(err) = result {
        let exit = exit_codes::ExitCode::from_anyhow(&err);
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(exit.code);
    }
}
