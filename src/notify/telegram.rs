use async_trait::async_trait;
use log::debug;
use teloxide::prelude::*;
use teloxide::types::Recipient;

use super::{Messenger, NotifyError};

/// Telegram messages through the teloxide client
pub struct TeloxideMessenger {
    bot: Option<Bot>,
}

impl TeloxideMessenger {
    pub fn new(bot_token: Option<String>) -> Self {
        Self { bot: bot_token.map(Bot::new) }
    }
}

fn recipient_for(chat: &str) -> Recipient {
    match chat.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if chat.starts_with('@') => Recipient::ChannelUsername(chat.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{}", chat)),
    }
}

#[async_trait]
impl Messenger for TeloxideMessenger {
    async fn send_text(&self, chat: &str, text: &str) -> Result<(), NotifyError> {
        let bot = self.bot.as_ref().ok_or(NotifyError::MissingToken)?;

        bot.send_message(recipient_for(chat), text)
            .await
            .map_err(|e| NotifyError::Client(e.to_string()))?;

        debug!("Sent Telegram message to {} (length={})", chat, text.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_chat_identifiers() {
        assert_eq!(recipient_for("-1001234"), Recipient::Id(ChatId(-1001234)));
        assert_eq!(recipient_for("@ToxiSolanaBot"), Recipient::ChannelUsername("@ToxiSolanaBot".into()));
        assert_eq!(recipient_for("ToxiSolanaBot"), Recipient::ChannelUsername("@ToxiSolanaBot".into()));
    }
}
