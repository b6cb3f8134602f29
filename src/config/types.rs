use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use log::warn;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// How the board page is retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageFetchMode {
    /// Plain GET of the board URL
    Http,
    /// Fully rendered page through a WebDriver browser session
    WebDriver,
}

impl std::str::FromStr for PageFetchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" | "get" => Ok(Self::Http),
            "webdriver" | "browser" => Ok(Self::WebDriver),
            other => Err(anyhow!("Unknown page fetch mode: {}", other)),
        }
    }
}

/// Which RugCheck flow is used for the security check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityCheckMode {
    /// Login with a message signed by the Solana keypair
    Signed,
    /// Direct report query with the static API key
    Static,
}

impl std::str::FromStr for SecurityCheckMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "signed" => Ok(Self::Signed),
            "static" | "key" => Ok(Self::Static),
            other => Err(anyhow!("Unknown security check mode: {}", other)),
        }
    }
}

/// Configuration for the pump signal scout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Token board page to scrape
    pub board_url: String,
    pub page_fetch_mode: PageFetchMode,
    /// WebDriver endpoint (chromedriver) used in browser mode
    pub webdriver_url: String,
    /// Telegram bot token used for both outgoing chats
    pub telegram_bot_token: Option<String>,
    /// Operator chat receiving human readable alerts
    pub telegram_chat_id: Option<String>,
    /// Chat of the trading bot receiving `/buy` commands
    pub trading_bot_chat: Option<String>,
    pub rugcheck_api_url: String,
    pub rugcheck_api_key: Option<String>,
    pub security_check_mode: SecurityCheckMode,
    pub tweetscout_api_url: String,
    pub tweetscout_api_key: Option<String>,
    pub twitter_api_url: String,
    pub twitter_bearer_token: Option<String>,
    /// Twitter list whose members are used for the sentiment read
    pub twitter_list_id: String,
    /// Upper bound of posts fetched per list member
    pub max_posts_per_handle: usize,
    /// Base64 encoded 64 byte Solana keypair
    pub solana_private_key: Option<String>,
    /// Seconds between two passes over the board
    pub poll_interval_seconds: u64,
    /// SOL amount sent to the trading bot with each buy
    pub buy_amount_sol: f64,
    /// Minimum TweetScout score (exclusive)
    pub min_reputation_score: f64,
    /// Maximum top holder percentage (exclusive)
    pub max_top_holder_percentage: f64,
    /// Directory holding the CSV files
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_url: "https://pump.fun/".to_string(),
            page_fetch_mode: PageFetchMode::Http,
            webdriver_url: "http://localhost:9515".to_string(),
            telegram_bot_token: None,
            telegram_chat_id: None,
            trading_bot_chat: None,
            rugcheck_api_url: "https://api.rugcheck.xyz/v1/".to_string(),
            rugcheck_api_key: None,
            security_check_mode: SecurityCheckMode::Signed,
            tweetscout_api_url: "https://api.tweetscout.io/".to_string(),
            tweetscout_api_key: None,
            twitter_api_url: "https://api.twitter.com/2/".to_string(),
            twitter_bearer_token: None,
            twitter_list_id: "1544277446526222336".to_string(),
            max_posts_per_handle: 100,
            solana_private_key: None,
            poll_interval_seconds: 1800, // 30 minutes
            buy_amount_sol: 1.0,
            min_reputation_score: 20.0,
            max_top_holder_percentage: 10.0,
            data_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    /// Names of the credentials that are not set
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let checks = [
            ("TELEGRAM_BOT_TOKEN", self.telegram_bot_token.is_none()),
            ("TELEGRAM_CHAT_ID", self.telegram_chat_id.is_none()),
            ("TOXI_SOLANA_BOT_ID", self.trading_bot_chat.is_none()),
            ("RUGCHECK_API_KEY", self.rugcheck_api_key.is_none()),
            ("TWEETSCOUT_API_KEY", self.tweetscout_api_key.is_none()),
            ("TWITTER_BEARER_TOKEN", self.twitter_bearer_token.is_none()),
        ];
        for (name, is_missing) in checks {
            if is_missing {
                missing.push(name);
            }
        }
        if self.security_check_mode == SecurityCheckMode::Signed && self.solana_private_key.is_none() {
            missing.push("SOLANA_PRIVATE_KEY");
        }
        missing
    }

    /// Reject numeric settings that would disable a check or send a nonsensical order
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("MIN_REPUTATION_SCORE", self.min_reputation_score),
            ("MAX_TOP_HOLDER_PERCENTAGE", self.max_top_holder_percentage),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() {
                return Err(anyhow!("{} must be a finite number, got {}", name, value));
            }
        }
        if !(self.buy_amount_sol.is_finite() && self.buy_amount_sol > 0.0) {
            return Err(anyhow!("BUY_AMOUNT_SOL must be a positive number, got {}", self.buy_amount_sol));
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str, target: &mut T) {
    if let Some(raw) = non_empty_var(name) {
        match raw.parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => warn!("Ignoring invalid value for {}: {}", name, raw),
        }
    }
}

/// Loads configuration from environment variables, falling back to default values
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    if let Some(url) = non_empty_var("BOARD_URL") {
        config.board_url = url;
    }

    if let Some(mode) = non_empty_var("PAGE_FETCH_MODE") {
        config.page_fetch_mode = mode.parse()?;
    }

    if let Some(url) = non_empty_var("WEBDRIVER_URL") {
        config.webdriver_url = url;
    }

    config.telegram_bot_token = non_empty_var("TELEGRAM_BOT_TOKEN");
    config.telegram_chat_id = non_empty_var("TELEGRAM_CHAT_ID");
    config.trading_bot_chat = non_empty_var("TOXI_SOLANA_BOT_ID");

    if let Some(url) = non_empty_var("RUGCHECK_API_URL") {
        config.rugcheck_api_url = url;
    }
    config.rugcheck_api_key = non_empty_var("RUGCHECK_API_KEY");

    if let Some(mode) = non_empty_var("SECURITY_CHECK_MODE") {
        config.security_check_mode = mode.parse()?;
    }

    if let Some(url) = non_empty_var("TWEETSCOUT_API_URL") {
        config.tweetscout_api_url = url;
    }
    config.tweetscout_api_key = non_empty_var("TWEETSCOUT_API_KEY");

    if let Some(url) = non_empty_var("TWITTER_API_URL") {
        config.twitter_api_url = url;
    }
    config.twitter_bearer_token = non_empty_var("TWITTER_BEARER_TOKEN");

    if let Some(list_id) = non_empty_var("TWITTER_LIST_ID") {
        config.twitter_list_id = list_id;
    }

    config.solana_private_key = non_empty_var("SOLANA_PRIVATE_KEY");

    parse_var("MAX_POSTS_PER_HANDLE", &mut config.max_posts_per_handle);
    parse_var("POLL_INTERVAL_SECONDS", &mut config.poll_interval_seconds);
    parse_var("BUY_AMOUNT_SOL", &mut config.buy_amount_sol);
    parse_var("MIN_REPUTATION_SCORE", &mut config.min_reputation_score);
    parse_var("MAX_TOP_HOLDER_PERCENTAGE", &mut config.max_top_holder_percentage);

    if let Some(dir) = non_empty_var("DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }

    config.validate()?;
    Ok(config)
}
