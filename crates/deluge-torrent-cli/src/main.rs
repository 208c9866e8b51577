//! # Deluge Torrent CLI
//!
//! ## Usage
//!
//! ```sh,ignore
//! DELUGE_PASSWORD=secret cargo run --release -p deluge-torrent-cli -- list
//! cargo run -p deluge-torrent-cli -- --url http://nas:8112/json add-magnet "magnet:?xt=..." -o add_paused=true
//! ```
//!
//! Settings are read from flags, then the environment (`DELUGE_URL`, `DELUGE_PASSWORD`), then a
//! `.env` file.

mod cli;

use clap::Parser;
use deluge_torrent_controller as _;
use deluge_torrent_types as _;
use thiserror as _;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use deluge_torrent_cli::{Action, DelugeConfiguration, run};

use crate::cli::Cli;

/// Initializes the tracing subscriber. Output goes to stderr so stdout only carries results.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let action = Action::try_from(cli.command)?;
    let config = DelugeConfiguration::from_env().with_overrides(cli.url, cli.password);
    debug!("Configuration: {config:?}");

    let client = config.connect().await?;
    let output = run(&client, action).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
