//! # promo_radar
//!
//! Watches a marketplace for discounted listings and dispatches the best
//! offers over email and a message gateway on an hourly schedule.
//!
//! ## Features
//!
//! - Scrapes promotion-filtered and popular keyword searches from
//!   Mercado Livre, with a best-effort account login
//! - Classifies listings into coarse categories from the query keyword
//! - Tags outbound product links with an affiliate id
//! - Ranks by discount, dedupes by title, and sends the top offers:
//!   everything in one HTML email, the best few as individual messages
//! - Hourly background schedule behind an interactive terminal menu
//!
//! ## Usage
//!
//! ```sh
//! promo_radar              # interactive menu
//! promo_radar --run-once   # one cycle, then exit
//! promo_radar --schedule   # headless hourly schedule
//! ```
//!
//! ## Architecture
//!
//! One cycle is a straight pipeline:
//! 1. **Fetching**: keyword searches against the marketplace, parsed into
//!    product records
//! 2. **Aggregating**: dedupe by title, rank by discount, cap the total
//! 3. **Notifying**: bulk email plus staggered per-item messages
//!
//! Every stage degrades instead of failing; see [`error`] for the
//! taxonomy.

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod affiliate;
mod classifier;
mod cli;
mod config;
mod cycle;
mod error;
mod menu;
mod models;
mod notify;
mod scheduler;
mod scrapers;
mod session;

use cli::Cli;
use config::Config;
use cycle::Orchestrator;
use scheduler::Scheduler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("promo_radar starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Honor a .env file before reading the environment; a missing file
    // just means the variables come from the real environment.
    match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path)?;
            info!(%path, "Loaded env file");
        }
        None => {
            if dotenvy::dotenv().is_err() {
                debug!("No .env file found");
            }
        }
    }

    let config = Config::from_env();
    if config.marketplace.credentials().is_none() {
        warn!("Marketplace credentials not configured; searches will run anonymously");
    }

    let orchestrator = Arc::new(Orchestrator::new(config.clone()));
    let mut scheduler = Scheduler::new(orchestrator, &config.schedule);

    if args.run_once {
        info!("Running a single cycle");
        scheduler.run_once().await;
        return Ok(());
    }

    if args.schedule {
        scheduler.start();
        info!("Headless schedule running; Ctrl-C to stop");
        tokio::signal::ctrl_c().await?;
        scheduler.stop().await;
        return Ok(());
    }

    menu::run(&config, &mut scheduler).await?;
    info!("Shutdown complete");
    Ok(())
}
