pub mod analyzer;
pub mod sentiment;
pub mod text;
pub mod twitter;

pub use analyzer::{SocialSignalAnalyzer, SocialSignals};
pub use sentiment::SentimentScorer;
pub use text::StopWords;
pub use twitter::{SocialAccount, SocialError, SocialPlatform, TwitterClient};

use crate::config::Config;
use reqwest::Client;

/// Create the list analyzer from the application configuration
pub fn create_analyzer_from_config(config: &Config, http: Client) -> SocialSignalAnalyzer {
    let twitter = TwitterClient::new(http, &config.twitter_api_url, config.twitter_bearer_token.clone());
    SocialSignalAnalyzer::new(Box::new(twitter), &config.twitter_list_id, config.max_posts_per_handle)
}
