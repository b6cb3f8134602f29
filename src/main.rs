use anyhow::{Context, Result};
use dotenv::dotenv;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use pump_signal_scout::config;
use pump_signal_scout::scheduler::{Scheduler, TokioClock};
use pump_signal_scout::solana;
use pump_signal_scout::strategy;

const USER_AGENT: &str = concat!("pump-signal-scout/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment variables
    dotenv().ok();

    init_logger();

    info!("Starting Pump Signal Scout...");

    let config = config::load_config()?;
    info!("Configuration loaded");

    let missing = config.missing_credentials();
    if !missing.is_empty() {
        warn!("Missing credentials, related checks will be indeterminate: {}", missing.join(", "));
    }

    let http = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(60))
        .build()
        .context("Failed to build HTTP client")?;

    let wallet = solana::load_wallet_from_config(&config)?.map(Arc::new);

    let pipeline = strategy::create_pipeline_from_config(&config, http, wallet)?;
    info!(
        "Polling {} every {} seconds",
        config.board_url, config.poll_interval_seconds
    );

    let scheduler = Scheduler::new(TokioClock, config.poll_interval());
    let pipeline = &pipeline;

    tokio::select! {
        iterations = scheduler.run(None, |_| async move { pipeline.run_once().await.map(|_| ()) }) => {
            info!("Scheduler stopped after {} iterations", iterations);
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        }
    }

    info!("Shutting down...");
    Ok(())
}

fn init_logger() {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "info")
    );
}
