use anyhow::{Result, Context, anyhow};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use solana_sdk::signer::keypair::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::pubkey::Pubkey;
use std::path::Path;
use std::fs;

/// Holds the operator keypair used to sign RugCheck login challenges
pub struct Wallet {
    keypair: Keypair,
}

impl Wallet {
    /// Create a new wallet with a random keypair
    pub fn new() -> Self {
        Self { keypair: Keypair::new() }
    }

    fn from_keypair_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 64 {
            return Err(anyhow!("Keypair must be 64 bytes, got {}", bytes.len()));
        }
        let keypair = Keypair::from_bytes(bytes)
            .map_err(|e| anyhow!("Invalid keypair bytes: {}", e))?;
        Ok(Self { keypair })
    }

    /// Load a wallet from a base64 encoded secret key (the `SOLANA_PRIVATE_KEY` format)
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .context("Solana private key is not valid base64")?;
        Self::from_keypair_bytes(&bytes)
    }

    /// Load a wallet from a keypair file (JSON byte array or base58)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read keypair file at {:?}", path.as_ref()))?;

        if let Ok(keypair_bytes) = serde_json::from_slice::<Vec<u8>>(&bytes) {
            return Self::from_keypair_bytes(&keypair_bytes);
        }

        let bytes_str = String::from_utf8_lossy(&bytes).trim().to_string();
        match bs58::decode(&bytes_str).into_vec() {
            Ok(keypair_bytes) => Self::from_keypair_bytes(&keypair_bytes),
            Err(_) => Err(anyhow!("Failed to parse keypair file")),
        }
    }

    /// Get the public key of the wallet
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Sign a buffer of data
    pub fn sign_message(&self, message: &[u8]) -> Vec<u8> {
        let signature = self.keypair.sign_message(message);
        signature.as_ref().to_vec()
    }

    /// Sign a UTF-8 message and return the base64 encoded signature
    pub fn sign_message_base64(&self, message: &str) -> String {
        STANDARD.encode(self.sign_message(message.as_bytes()))
    }

    /// Raw 64 byte keypair, secret half first
    pub fn keypair_bytes(&self) -> Vec<u8> {
        self.keypair.to_bytes().to_vec()
    }

    /// Export the secret key in the `SOLANA_PRIVATE_KEY` format
    pub fn export_base64(&self) -> String {
        STANDARD.encode(self.keypair_bytes())
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}
