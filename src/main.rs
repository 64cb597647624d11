// ABOUTME: Entry point for codedeck — a terminal client for a coding-practice platform.
// ABOUTME: Parses CLI args, loads config, and launches the app.

use clap::Parser;

use codedeck::app::App;
use codedeck::config::Config;

/// Terminal client for the codedeck practice platform.
#[derive(Parser, Debug)]
#[command(name = "deck", version, about)]
struct Cli {
    /// Backend API base URL (overrides config and CODEDECK_API_URL).
    #[arg(long)]
    api_url: Option<String>,

    /// Start with default workspaces and no auth, ignoring persisted state.
    #[arg(long)]
    fresh: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load local .env if present so CODEDECK_API_URL can come from it.
    let _ = dotenvy::dotenv();

    let mut config = Config::load()?;
    if let Ok(url) = std::env::var("CODEDECK_API_URL") {
        if !url.is_empty() {
            config.backend.base_url = url;
        }
    }
    if let Some(url) = cli.api_url {
        config.backend.base_url = url;
    }

    App::new(config, cli.fresh).run().await
}
