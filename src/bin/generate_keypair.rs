use anyhow::Result;
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use pump_signal_scout::solana::Wallet;

#[derive(Parser)]
#[command(name = "generate_keypair")]
#[command(about = "Create or convert the keypair used to sign RugCheck logins", long_about = None)]
struct Args {
    /// Convert an existing keypair file (JSON byte array or base58) instead of generating one
    #[arg(long)]
    from_file: Option<PathBuf>,

    /// Also write the keypair as a JSON byte array to this path
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let wallet = match &args.from_file {
        Some(path) => Wallet::from_file(path)?,
        None => Wallet::new(),
    };

    if let Some(path) = &args.output {
        let mut file = File::create(path)?;
        file.write_all(serde_json::to_string(&wallet.keypair_bytes())?.as_bytes())?;
        println!("Path: {:?}", path);
    }

    println!("Pubkey: {}", wallet.pubkey());
    println!("Add this line to your .env file:");
    println!("SOLANA_PRIVATE_KEY={}", wallet.export_base64());

    Ok(())
}
