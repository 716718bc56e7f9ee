mod config;
mod gcal;
mod sync;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "weekboard")]
#[command(about = "Publish this week's Google Calendar events as HTML fragments for a kiosk display")]
struct Cli {
    /// Path to the config file (defaults to ~/.config/weekboard/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate with Google Calendar and store tokens
    Auth,
    /// List available calendars and their ids
    Calendars,
    /// Fetch this week's events and publish the display and print fragments
    Sync,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Auth => cmd_auth(&cfg).await,
        Commands::Calendars => cmd_calendars(&cfg).await,
        Commands::Sync => sync::run(&cfg).await,
    }
}

async fn cmd_auth(cfg: &config::Config) -> Result<()> {
    let google = cfg.google()?;

    println!("Authenticating with Google Calendar...");

    let tokens = gcal::authenticate(google).await?;
    config::save_tokens(&tokens)?;

    let account = gcal::fetch_user_email(google, &tokens).await?;
    println!("\nAuthenticated as: {}", account);
    println!("Run `weekboard sync` to publish this week's schedule.");

    Ok(())
}

async fn cmd_calendars(cfg: &config::Config) -> Result<()> {
    let google = cfg.google()?;
    let tokens = gcal::fresh_tokens(google).await?;

    let calendars = gcal::fetch_calendars(google, &tokens).await?;
    for calendar in calendars {
        let marker = if calendar.primary { " (primary)" } else { "" };
        println!("\"{}\": {}{}", calendar.name, calendar.id, marker);
    }

    Ok(())
}
