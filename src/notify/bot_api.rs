use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use super::{Messenger, NotifyError};

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Telegram Bot API `sendMessage` over plain HTTP
pub struct BotApiMessenger {
    client: Client,
    api_url: String,
    bot_token: Option<String>,
}

impl BotApiMessenger {
    pub fn new(client: Client, bot_token: Option<String>) -> Self {
        Self::with_api_url(client, TELEGRAM_API_URL, bot_token)
    }

    pub fn with_api_url(client: Client, api_url: &str, bot_token: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            bot_token,
        }
    }

    fn send_message_url(&self, token: &str) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, token)
    }
}

#[async_trait]
impl Messenger for BotApiMessenger {
    async fn send_text(&self, chat: &str, text: &str) -> Result<(), NotifyError> {
        let token = self.bot_token.as_deref().ok_or(NotifyError::MissingToken)?;

        let response = self
            .client
            .post(self.send_message_url(token))
            .form(&[("chat_id", chat), ("text", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        debug!("Sent message to {} (length={})", chat, text.len());
        Ok(())
    }
}
