use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info, warn};

use super::decision::{Decision, DecisionPipeline};
use crate::board::{PageFetcher, TokenExtractor};
use crate::db::{BuySignalRow, CsvStore};
use crate::models::{BuySignal, SocialReport, TokenRecord};
use crate::notify::{DispatchOutcome, SignalDispatcher};
use crate::social::SocialSignals;
use crate::utils::format_mint;

/// Counters for one pass over the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IterationReport {
    pub tokens_seen: usize,
    /// Tokens with a mint and at least one social link
    pub eligible: usize,
    pub admitted: usize,
    /// Admitted tokens whose buy command reached the trading bot
    pub signals_sent: usize,
}

/// Fetch, filter and forward: one full pass over the board
pub struct SignalPipeline {
    fetcher: Box<dyn PageFetcher>,
    extractor: TokenExtractor,
    social: Box<dyn SocialSignals>,
    decisions: DecisionPipeline,
    dispatcher: SignalDispatcher,
    store: Option<CsvStore>,
    buy_amount_sol: f64,
}

impl SignalPipeline {
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        extractor: TokenExtractor,
        social: Box<dyn SocialSignals>,
        decisions: DecisionPipeline,
        dispatcher: SignalDispatcher,
        buy_amount_sol: f64,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            social,
            decisions,
            dispatcher,
            store: None,
            buy_amount_sol,
        }
    }

    pub fn with_store(mut self, store: CsvStore) -> Self {
        self.store = Some(store);
        self
    }

    fn persist<F>(&self, what: &str, write: F)
    where
        F: FnOnce(&CsvStore) -> Result<()>,
    {
        if let Some(store) = &self.store {
            if let Err(e) = write(store) {
                warn!("Failed to save {}: {:#}", what, e);
            }
        }
    }

    async fn forward(&self, token: &TokenRecord, mint: &str, social: Option<&SocialReport>) -> DispatchOutcome {
        let signal = BuySignal {
            mint_address: mint.to_string(),
            sol_amount: self.buy_amount_sol,
        };

        let outcome = self.dispatcher.dispatch(token, &signal).await;
        debug!("Dispatch outcome for {}: {:?}", format_mint(mint), outcome);
        if outcome.buy_sent {
            info!("Sent buy signal for {} ({})", token.display_name(), format_mint(mint));
        } else {
            warn!("Buy signal for {} ({}) was not delivered", token.display_name(), format_mint(mint));
        }

        let sentiment = social.and_then(|report| report.average_sentiment);
        let row = BuySignalRow::new(token, &signal, sentiment, Utc::now());
        self.persist("buy signal", |store| store.append_buy_signal(&row));
        outcome
    }

    /// Run one pass. Only a failed page fetch aborts the pass.
    pub async fn run_once(&self) -> Result<IterationReport> {
        info!("Fetching board page...");
        let html = self
            .fetcher
            .fetch_page()
            .await
            .context("Failed to retrieve the board page")?;

        let tokens = self.extractor.extract(&html);
        info!("Found {} tokens on the board", tokens.len());
        self.persist("tokens", |store| store.save_tokens(&tokens));

        let mut report = IterationReport { tokens_seen: tokens.len(), ..Default::default() };
        let mut social: Option<SocialReport> = None;

        for token in &tokens {
            let Some(mint) = token.mint_address.as_deref().filter(|_| token.is_eligible()) else {
                debug!("Skipping {}: missing mint or social links", token.display_name());
                continue;
            };
            report.eligible += 1;

            // The monitored list is the same for every token, read it once per pass
            if social.is_none() {
                social = Some(self.social.analyze().await);
            }

            let evaluation = self.decisions.evaluate(token).await;
            match evaluation.decision {
                Decision::Admit => {
                    let outcome = self.forward(token, mint, social.as_ref()).await;
                    report.admitted += 1;
                    if outcome.buy_sent {
                        report.signals_sent += 1;
                    }
                }
                Decision::Reject(reason) => {
                    info!("Token {} does not meet criteria: {}", token.display_name(), reason);
                }
            }
        }

        if let Some(social) = &social {
            self.persist("sentiment analysis", |store| store.save_sentiment(&social.samples));
            self.persist("word frequencies", |store| store.save_word_frequencies(&social.word_frequencies));
        }

        info!(
            "Pass complete: {} tokens, {} eligible, {} admitted, {} signals sent",
            report.tokens_seen, report.eligible, report.admitted, report.signals_sent
        );
        Ok(report)
    }
}
