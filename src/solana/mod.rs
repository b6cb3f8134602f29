pub mod wallet;

pub use wallet::Wallet;

use crate::config::Config;
use anyhow::{Result, Context};
use log::{info, warn};

/// Load the signing wallet from the application configuration, if a key is configured
pub fn load_wallet_from_config(config: &Config) -> Result<Option<Wallet>> {
    match config.solana_private_key.as_deref() {
        Some(encoded) => {
            let wallet = Wallet::from_base64(encoded)
                .context("Failed to load Solana keypair from SOLANA_PRIVATE_KEY")?;
            info!("Solana keypair loaded: {}", wallet.pubkey());
            Ok(Some(wallet))
        }
        None => {
            warn!("Solana private key not found in environment");
            Ok(None)
        }
    }
}
