pub mod rugcheck;
pub mod tweetscout;

pub use rugcheck::{RugCheckKeyEvaluator, RugCheckSignedEvaluator};
pub use tweetscout::TweetScoutEvaluator;

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{Config, SecurityCheckMode};
use crate::models::{ReputationVerdict, SecurityVerdict};
use crate::solana::Wallet;

/// Why an external check could not produce an answer
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned status {0}")]
    Status(u16),
}

/// On-chain safety check for a mint
#[async_trait]
pub trait SecurityEvaluator: Send + Sync {
    async fn evaluate(&self, mint_address: &str) -> SecurityVerdict;
}

/// Reputation check for a social handle
#[async_trait]
pub trait ReputationEvaluator: Send + Sync {
    async fn evaluate(&self, handle: &str) -> ReputationVerdict;
}

/// Create the security evaluator selected in the application configuration
pub fn create_security_evaluator(
    config: &Config,
    http: Client,
    wallet: Option<Arc<Wallet>>,
) -> Box<dyn SecurityEvaluator> {
    match config.security_check_mode {
        SecurityCheckMode::Signed => Box::new(RugCheckSignedEvaluator::new(
            http,
            &config.rugcheck_api_url,
            config.rugcheck_api_key.clone(),
            wallet,
        )),
        SecurityCheckMode::Static => Box::new(RugCheckKeyEvaluator::new(
            http,
            &config.rugcheck_api_url,
            config.rugcheck_api_key.clone(),
        )),
    }
}

/// Create the reputation evaluator from the application configuration
pub fn create_reputation_evaluator(config: &Config, http: Client) -> Box<dyn ReputationEvaluator> {
    Box::new(TweetScoutEvaluator::new(
        http,
        &config.tweetscout_api_url,
        config.tweetscout_api_key.clone(),
        config.min_reputation_score,
    ))
}

/// Join a service base URL and a path without doubling slashes
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
