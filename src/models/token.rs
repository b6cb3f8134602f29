use serde::{Deserialize, Serialize};

/// A token listed on the board page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub mint_address: Option<String>,
    /// Social links in page order
    pub social_links: Vec<String>,
}

impl TokenRecord {
    /// Name for log lines, falls back to the mint or a placeholder
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.mint_address.as_deref())
            .unwrap_or("<unnamed>")
    }

    /// A token needs both a mint and at least one social link to be screened
    pub fn is_eligible(&self) -> bool {
        self.mint_address.is_some() && !self.social_links.is_empty()
    }
}

/// Instruction forwarded to the trading bot for an admitted token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuySignal {
    pub mint_address: String,
    pub sol_amount: f64,
}

impl BuySignal {
    pub fn command(&self) -> String {
        format!("/buy {}", self.mint_address)
    }

    pub fn amount_message(&self) -> String {
        format!("Amount: {} SOL", self.sol_amount)
    }
}
