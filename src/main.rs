//! form-relay
//!
//! Accepts form submissions over HTTP and persists them through a UDP relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌─────────────── http process ───────────────┐
//!   Client ──────▶│ axum router → pages.rs / static files      │
//!   POST form     │             → forward.rs ──┐               │
//!   ◀── 302 / ────│                            │ UDP datagram  │
//!                 └────────────────────────────┼───────────────┘
//!                                              ▼
//!                 ┌────────────── relay process ───────────────┐
//!                 │ listener.rs → codec::form → message        │
//!                 │             → store::sink ─────────────────┼──▶ document store
//!                 └────────────────────────────────────────────┘
//! ```
//!
//! `form-relay all` starts both processes; `form-relay http` and
//! `form-relay relay` start one each.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Instrument;

use form_relay::config::load_or_default;
use form_relay::lifecycle::{run_worker, Role, Supervisor};
use form_relay::observability::logging;

#[derive(Parser)]
#[command(name = "form-relay", version)]
#[command(about = "HTTP form front-end and UDP persistence relay", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP front-end and the relay as two processes
    All,
    /// Run only the HTTP front-end
    Http,
    /// Run only the UDP relay
    Relay,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init(&config.observability);

    match cli.command {
        Commands::All => {
            let span = tracing::info_span!("worker", process = "supervisor");
            tracing::info!(parent: &span, version = env!("CARGO_PKG_VERSION"), "form-relay starting");
            Supervisor::current(cli.config)?.run().instrument(span).await?;
        }
        Commands::Http => run_worker(Role::Http, &config).await?,
        Commands::Relay => run_worker(Role::Relay, &config).await?,
    }

    Ok(())
}
