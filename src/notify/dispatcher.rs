use log::{info, warn};
use std::sync::Arc;

use super::Messenger;
use crate::models::{BuySignal, TokenRecord};

/// What reached the chats for one admitted token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub buy_sent: bool,
    pub amount_sent: bool,
    pub alert_sent: bool,
}

/// Forwards admitted tokens to the trading bot and the operator chat
pub struct SignalDispatcher {
    messenger: Arc<dyn Messenger>,
    trading_bot_chat: Option<String>,
    operator_chat: Option<String>,
}

/// Human readable alert for the operator chat
pub fn operator_alert(token: &TokenRecord, signal: &BuySignal) -> String {
    format!(
        "New Token Buy Signal Sent!\nToken Name: {}\nMint Address: {}\nSymbol: {}",
        token.name.as_deref().unwrap_or("N/A"),
        signal.mint_address,
        token.symbol.as_deref().unwrap_or("N/A"),
    )
}

impl SignalDispatcher {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        trading_bot_chat: Option<String>,
        operator_chat: Option<String>,
    ) -> Self {
        Self { messenger, trading_bot_chat, operator_chat }
    }

    /// Send the buy command, then the amount once the command went through
    async fn send_buy_signal(&self, signal: &BuySignal, outcome: &mut DispatchOutcome) {
        let Some(chat) = self.trading_bot_chat.as_deref() else {
            warn!("No trading bot chat configured, buy signal for {} not sent", signal.mint_address);
            return;
        };

        if let Err(e) = self.messenger.send_text(chat, &signal.command()).await {
            warn!("Failed to send buy signal for {}: {}", signal.mint_address, e);
            return;
        }
        outcome.buy_sent = true;
        info!("Buy signal for {} sent successfully", signal.mint_address);

        match self.messenger.send_text(chat, &signal.amount_message()).await {
            Ok(()) => {
                outcome.amount_sent = true;
                info!("Sent {} SOL for purchase", signal.sol_amount);
            }
            Err(e) => warn!("Failed to send SOL amount: {}", e),
        }
    }

    async fn send_operator_alert(&self, token: &TokenRecord, signal: &BuySignal, outcome: &mut DispatchOutcome) {
        let Some(chat) = self.operator_chat.as_deref() else {
            warn!("No operator chat configured, alert for {} not sent", signal.mint_address);
            return;
        };

        match self.messenger.send_text(chat, &operator_alert(token, signal)).await {
            Ok(()) => {
                outcome.alert_sent = true;
                info!("Operator notified about {}", token.display_name());
            }
            Err(e) => warn!("Failed to send operator alert: {}", e),
        }
    }

    /// Fire-and-forget delivery; failures are logged and reported in the outcome
    pub async fn dispatch(&self, token: &TokenRecord, signal: &BuySignal) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        self.send_buy_signal(signal, &mut outcome).await;
        self.send_operator_alert(token, signal, &mut outcome).await;
        outcome
    }
}
