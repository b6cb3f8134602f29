pub mod bot_api;
pub mod dispatcher;
#[cfg(feature = "telegram")]
mod telegram;

pub use bot_api::BotApiMessenger;
pub use dispatcher::{DispatchOutcome, SignalDispatcher};

#[cfg(feature = "telegram")]
pub use telegram::TeloxideMessenger;

use async_trait::async_trait;
use log::info;
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("no bot token configured")]
    MissingToken,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("messaging API returned status {0}")]
    Status(u16),
    #[error("messaging client error: {0}")]
    Client(String),
}

/// Sends plain text messages to a chat
#[async_trait]
pub trait Messenger: Send + Sync {
    /// `chat` is a numeric chat id or an `@username`
    async fn send_text(&self, chat: &str, text: &str) -> Result<(), NotifyError>;
}

#[cfg(feature = "telegram")]
fn create_messenger(config: &Config, _http: Client) -> Arc<dyn Messenger> {
    info!("Using teloxide for Telegram messages");
    Arc::new(TeloxideMessenger::new(config.telegram_bot_token.clone()))
}

#[cfg(not(feature = "telegram"))]
fn create_messenger(config: &Config, http: Client) -> Arc<dyn Messenger> {
    info!("Using the Telegram Bot API over HTTP for messages");
    Arc::new(BotApiMessenger::new(http, config.telegram_bot_token.clone()))
}

/// Create the buy signal dispatcher from the application configuration
pub fn create_dispatcher_from_config(config: &Config, http: Client) -> SignalDispatcher {
    SignalDispatcher::new(
        create_messenger(config, http),
        config.trading_bot_chat.clone(),
        config.telegram_chat_id.clone(),
    )
}
