use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;

use pump_signal_scout::config::load_config;
use pump_signal_scout::models::TokenRecord;
use pump_signal_scout::solana::load_wallet_from_config;
use pump_signal_scout::strategy::{create_decision_pipeline, Decision};

#[derive(Parser)]
#[command(name = "check_token")]
#[command(about = "Run the security and reputation checks for a single token", long_about = None)]
struct Args {
    /// Mint address of the token
    #[arg(short, long)]
    mint: String,

    /// Social link of the token, the first one is used for the reputation check
    #[arg(short, long)]
    link: Vec<String>,

    /// Twitter handle, shorthand for --link https://x.com/<handle>
    #[arg(long, conflicts_with = "link")]
    handle: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "warn"));

    let args = Args::parse();
    let config = load_config()?;

    let social_links = match &args.handle {
        Some(handle) => vec![format!("https://x.com/{}", handle.trim_start_matches('@'))],
        None => args.link.clone(),
    };
    let token = TokenRecord {
        mint_address: Some(args.mint.clone()),
        social_links,
        ..Default::default()
    };

    let http = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let wallet = load_wallet_from_config(&config)?.map(Arc::new);
    let pipeline = create_decision_pipeline(&config, http, wallet);

    println!("Checking {}", args.mint);
    println!("{}", "=".repeat(60));

    let evaluation = pipeline.evaluate(&token).await;
    match &evaluation.security {
        Some(security) => println!(
            "Security:   {:?} (top holder {:.2}%)",
            security.verdict, security.top_holder_percentage
        ),
        None => println!("Security:   not checked"),
    }
    match &evaluation.reputation {
        Some(reputation) => println!("Reputation: {:?} (score {:.1})", reputation.verdict, reputation.score),
        None => println!("Reputation: not checked"),
    }

    match evaluation.decision {
        Decision::Admit => println!("Decision:   BUY"),
        Decision::Reject(reason) => println!("Decision:   skip ({})", reason),
    }

    Ok(())
}
